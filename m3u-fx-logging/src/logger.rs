use crate::{Error, Result};
use log::{debug, info, LevelFilter};
use log4rs::append::console::ConsoleAppender;
use log4rs::append::rolling_file::policy::compound::roll::fixed_window::FixedWindowRoller;
use log4rs::append::rolling_file::policy::compound::trigger::size::SizeTrigger;
use log4rs::append::rolling_file::policy::compound::CompoundPolicy;
use log4rs::append::rolling_file::RollingFileAppender;
use log4rs::config::{Appender, Logger, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::{Config, Handle};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

const LOG_FORMAT_CONSOLE: &str = "\x1B[37m{d(%Y-%m-%d %H:%M:%S%.3f)}\x1B[0m {h({l:>5.5})} \x1B[37m[{T:>15.15}]\x1B[0m \x1B[36m{t:<40.40}\x1B[0m \x1B[37m:\x1B[0m {m}{n}";
const LOG_FORMAT_FILE: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {l:>5.5} [{T:>15.15}] {t:<40.40} : {m}{n}";
const CONSOLE_APPENDER: &str = "stdout";
const FILE_APPENDER: &str = "file";
const ROLLED_FILE_PATTERN: &str = "m3u-fx.{}.log";
const ROLLED_FILE_COUNT: u32 = 5;
const LOG_FILE_SIZE: u64 = 50 * 1024 * 1024;

static INITIALIZED: AtomicBool = AtomicBool::new(false);

/// The process wide logger of m3u-fx.
///
/// It always writes to the console and optionally to a size based rolling log file.
/// A `log4rs` YAML config file can be used instead of the programmatic setup.
#[derive(Debug)]
pub struct FxLogger {
    handle: Handle,
}

impl FxLogger {
    /// Returns a builder instance for the logger.
    pub fn builder() -> FxLoggerBuilder {
        FxLoggerBuilder::default()
    }

    /// Check if a logger has already been installed within this process.
    pub fn is_initialized() -> bool {
        INITIALIZED.load(Ordering::Acquire)
    }

    fn new(
        root_level: LevelFilter,
        config_path: Option<PathBuf>,
        log_path: Option<PathBuf>,
        loggers: Vec<(String, LevelFilter)>,
    ) -> Result<Self> {
        if INITIALIZED
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(Error::AlreadyInitialized);
        }

        let config = match config_path {
            Some(path) => Self::load_from_config(&path),
            None => Self::create_config(root_level, log_path.as_deref(), loggers),
        };
        let handle = config
            .and_then(|e| log4rs::init_config(e).map_err(|e| Error::InvalidConfig(e.to_string())))
            .map_err(|e| {
                // allow another attempt with a corrected config
                INITIALIZED.store(false, Ordering::Release);
                e
            })?;

        info!("m3u-fx logger has been initialized");
        Ok(Self { handle })
    }

    /// Returns the root logging level of the logger.
    pub fn root_log_level(&self) -> LevelFilter {
        self.handle.max_log_level()
    }

    fn load_from_config(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Err(Error::NotFound(path.to_string_lossy().to_string()));
        }

        log4rs::config::load_config_file(path, Default::default())
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    fn create_config(
        root_level: LevelFilter,
        log_path: Option<&Path>,
        loggers: Vec<(String, LevelFilter)>,
    ) -> Result<Config> {
        let mut root = Root::builder().appender(CONSOLE_APPENDER);
        let mut config_builder = Config::builder().appender(
            Appender::builder().build(
                CONSOLE_APPENDER,
                Box::new(
                    ConsoleAppender::builder()
                        .encoder(Box::new(PatternEncoder::new(LOG_FORMAT_CONSOLE)))
                        .build(),
                ),
            ),
        );

        if let Some(path) = log_path {
            config_builder = config_builder.appender(Self::create_file_appender(path)?);
            root = root.appender(FILE_APPENDER);
        }

        for (logger, level) in loggers.into_iter() {
            debug!("Setting log level of {} to {}", logger, level);
            config_builder = config_builder.logger(Logger::builder().build(logger, level));
        }

        config_builder
            .build(root.build(root_level))
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    fn create_file_appender(path: &Path) -> Result<Appender> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let roller = FixedWindowRoller::builder()
            .base(1)
            .build(ROLLED_FILE_PATTERN, ROLLED_FILE_COUNT)
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        let policy = CompoundPolicy::new(
            Box::new(SizeTrigger::new(LOG_FILE_SIZE)),
            Box::new(roller),
        );

        Ok(Appender::builder().build(
            FILE_APPENDER,
            Box::new(
                RollingFileAppender::builder()
                    .encoder(Box::new(PatternEncoder::new(LOG_FORMAT_FILE)))
                    .append(false)
                    .build(path, Box::new(policy))
                    .map_err(|e| Error::InvalidConfig(e.to_string()))?,
            ),
        ))
    }
}

#[derive(Debug, Default)]
pub struct FxLoggerBuilder {
    root_level: Option<LevelFilter>,
    config_path: Option<PathBuf>,
    log_path: Option<PathBuf>,
    loggers: HashMap<String, LevelFilter>,
}

impl FxLoggerBuilder {
    /// Set the root level of the logger, defaults to [LevelFilter::Info].
    pub fn root_level(&mut self, level: LevelFilter) -> &mut Self {
        self.root_level = Some(level);
        self
    }

    /// Use the given `log4rs` YAML config file instead of the programmatic setup.
    pub fn config_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Also write the logging to the given (rolling) log file.
    pub fn log_path(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.log_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Override the log level of the given module path.
    pub fn logger<S: AsRef<str>>(&mut self, module: S, level: LevelFilter) -> &mut Self {
        self.loggers.insert(module.as_ref().to_string(), level);
        self
    }

    /// Consumes the builder state and installs the logger.
    pub fn build(&mut self) -> Result<FxLogger> {
        let root_level = self.root_level.take().unwrap_or(LevelFilter::Info);
        let config_path = self.config_path.take();
        let log_path = self.log_path.take();
        let loggers = self.loggers.drain().collect::<Vec<_>>();

        FxLogger::new(root_level, config_path, log_path, loggers)
    }
}
