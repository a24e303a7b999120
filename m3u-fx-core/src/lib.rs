/// The current application version of m3u-fx.
pub const VERSION: &str = "0.1.0";

pub mod core;

#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use std::fmt::{Display, Formatter};
    use std::sync::Once;
    use std::time::Duration;

    use async_trait::async_trait;
    use fx_callback::{Callback, Subscriber, Subscription};
    use log::LevelFilter;
    use m3u_fx_logging::{Error, FxLogger};
    use mockall::mock;
    use tokio::select;
    use tokio::sync::mpsc::UnboundedReceiver;

    use crate::core::loader::ContentSource;
    use crate::core::players::{EngineEvent, PlaybackEngine, PlaybackError};

    static INIT: Once = Once::new();

    /// Initializes the logger with the specified log level.
    #[macro_export]
    macro_rules! init_logger {
        ($level:expr) => {
            $crate::testing::init_logger_level($level)
        };
        () => {
            $crate::testing::init_logger_level(log::LevelFilter::Trace)
        };
    }

    /// Initializes the logger with the specified log level.
    pub fn init_logger_level(level: LevelFilter) {
        INIT.call_once(|| {
            match FxLogger::builder()
                .root_level(level)
                .logger("fx_callback", LevelFilter::Info)
                .logger("h2", LevelFilter::Info)
                .logger("httpmock::server", LevelFilter::Debug)
                .logger("hyper", LevelFilter::Info)
                .logger("hyper_util", LevelFilter::Info)
                .logger("mio", LevelFilter::Info)
                .logger("reqwest", LevelFilter::Info)
                .logger("want", LevelFilter::Info)
                .build()
            {
                Ok(_) | Err(Error::AlreadyInitialized) => {}
                Err(e) => panic!("failed to initialize the test logger, {}", e),
            }
        })
    }

    mock! {
        #[derive(Debug)]
        pub PlaybackEngine {}

        #[async_trait]
        impl PlaybackEngine for PlaybackEngine {
            async fn set_source(&self, location: String);
            async fn play(&self) -> Result<(), PlaybackError>;
            async fn pause(&self);
            async fn set_position(&self, time: u64);
        }

        impl Callback<EngineEvent> for PlaybackEngine {
            fn subscribe(&self) -> Subscription<EngineEvent>;
            fn subscribe_with(&self, subscriber: Subscriber<EngineEvent>);
        }
    }

    impl Display for MockPlaybackEngine {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            write!(f, "MockPlaybackEngine")
        }
    }

    mock! {
        #[derive(Debug)]
        pub ContentSource {}

        #[async_trait]
        impl ContentSource for ContentSource {
            async fn fetch_text(&self, url: String) -> crate::core::Result<String>;
        }
    }

    #[macro_export]
    macro_rules! assert_timeout {
        ($timeout:expr, $condition:expr) => {{
            $crate::assert_timeout!($timeout, $condition, "")
        }};
        ($timeout:expr, $condition:expr, $message:expr) => {{
            let result = tokio::select! {
                _ = tokio::time::sleep($timeout) => false,
                result = async {
                    loop {
                        if $condition {
                            return true;
                        }

                        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    }
                } => result,
            };

            if !result {
                assert!(
                    false,
                    concat!("Timeout assertion failed after {:?}: ", $message),
                    $timeout
                );
            }
        }};
    }

    #[macro_export]
    macro_rules! assert_timeout_eq {
        ($timeout:expr, $left:expr, $right:expr) => {{
            let mut actual_value = $right;
            let result = tokio::select! {
                _ = tokio::time::sleep($timeout) => false,
                result = async {
                    loop {
                        actual_value = $right;
                        if $left == actual_value {
                            return true;
                        }

                        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                    }
                } => result,
            };

            if !result {
                assert!(
                    false,
                    "Assertion timed out after {:?}, expected {} but got {} instead",
                    $timeout, $left, actual_value
                );
            }
        }};
    }

    /// Receive a message from the given receiver, or panic if the timeout is reached.
    #[macro_export]
    macro_rules! recv_timeout {
        ($receiver:expr, $timeout:expr) => {
            $crate::testing::recv_timeout($receiver, $timeout, "expected to receive an instance")
                .await
        };
        ($receiver:expr, $timeout:expr, $message:expr) => {
            $crate::testing::recv_timeout($receiver, $timeout, $message).await
        };
    }

    /// Receive a message from the given receiver, or panic if the timeout is reached.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiver to receive the message from.
    /// * `timeout` - The timeout to wait for the message.
    /// * `message` - The message to print if the timeout is reached.
    pub async fn recv_timeout<T>(
        receiver: &mut UnboundedReceiver<T>,
        timeout: Duration,
        message: &str,
    ) -> T {
        select! {
            _ = tokio::time::sleep(timeout) => panic!("receiver timed-out after {}ms, {}", timeout.as_millis(), message),
            result = receiver.recv() => result.expect(message)
        }
    }
}
