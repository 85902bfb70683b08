//! # Integration Tests
//!
//! End-to-end tests across crate boundaries.
//!
//! Covers:
//! - config -> filter -> dispatcher wiring with a mock broker sink
//! - the full relay path against an in-process fake nsqd

#[cfg(test)]
mod e2e_tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    use contracts::{PublishSink, RelayConfig, RelayError};
    use dispatcher::{DispatchError, Dispatcher, DispatcherConfig};
    use filtering::LineFilter;

    /// Mock sink recording published payloads
    #[derive(Default)]
    struct RecordingSink {
        published: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
        closed: Arc<AtomicBool>,
    }

    impl PublishSink for RecordingSink {
        fn name(&self) -> &str {
            "recording"
        }

        async fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), RelayError> {
            self.published
                .lock()
                .unwrap()
                .push((topic.to_string(), payload.to_vec()));
            Ok(())
        }

        async fn close(&mut self) -> Result<(), RelayError> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    fn relay_config() -> RelayConfig {
        RelayConfig {
            topic: "logs".to_string(),
            nsqd_addr: "localhost:4150".to_string(),
            regex: Some(r#"^\{"test":"#.to_string()),
            ..Default::default()
        }
    }

    /// Config file semantics -> filter -> dispatcher, line by line.
    #[tokio::test]
    async fn test_config_to_dispatch_pipeline() {
        let cfg = relay_config();
        config_loader::validate(&cfg).unwrap();

        let filter = LineFilter::from_config(&cfg).unwrap();
        let sink = RecordingSink::default();
        let published = Arc::clone(&sink.published);
        let closed = Arc::clone(&sink.closed);

        let mut dispatcher =
            Dispatcher::new(DispatcherConfig::from_relay_config(&cfg), filter, sink);

        // Rejected by the regex: reported as zero bytes, not an error.
        assert_eq!(dispatcher.write(br#"test {"test":"#).await.unwrap(), 0);
        // Empty line: short-circuits.
        assert_eq!(dispatcher.write(b"").await.unwrap(), 0);
        // Accepted: full 17 bytes reach the topic.
        assert_eq!(
            dispatcher.write(br#"{"test": "value"}"#).await.unwrap(),
            17
        );

        dispatcher.stop().await.unwrap();

        let published = published.lock().unwrap();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].0, "logs");
        assert_eq!(published[0].1, br#"{"test": "value"}"#.to_vec());
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_negated_contains_pipeline() {
        let cfg = RelayConfig {
            contains: Some("!api".to_string()),
            regex: None,
            ..relay_config()
        };
        let filter = LineFilter::from_config(&cfg).unwrap();
        let sink = RecordingSink::default();
        let published = Arc::clone(&sink.published);
        let mut dispatcher =
            Dispatcher::new(DispatcherConfig::from_relay_config(&cfg), filter, sink);

        assert_eq!(dispatcher.write(br#"test {"test":"#).await.unwrap(), 13);
        assert_eq!(dispatcher.write(br#"{"test": "api"}"#).await.unwrap(), 0);

        assert_eq!(published.lock().unwrap().len(), 1);
    }

    /// A sink that always fails, for caller-survives-error behavior.
    struct FailingSink;

    impl PublishSink for FailingSink {
        fn name(&self) -> &str {
            "failing"
        }

        async fn publish(&mut self, topic: &str, _payload: &[u8]) -> Result<(), RelayError> {
            Err(RelayError::broker_publish(topic, "nsqd went away"))
        }

        async fn close(&mut self) -> Result<(), RelayError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_publish_errors_carry_attempted_size() {
        let cfg = RelayConfig {
            regex: None,
            ..relay_config()
        };
        let mut dispatcher = Dispatcher::new(
            DispatcherConfig::from_relay_config(&cfg),
            LineFilter::from_config(&cfg).unwrap(),
            FailingSink,
        );

        let err = dispatcher.write(b"lost line").await.unwrap_err();
        assert_eq!(err.bytes_written(), 9);
        assert!(matches!(err, DispatchError::Publish { .. }));

        // The dispatcher survives and keeps dispatching.
        let err = dispatcher.write(b"another").await.unwrap_err();
        assert_eq!(err.bytes_written(), 7);
    }
}

#[cfg(test)]
mod broker_e2e_tests {
    use contracts::RelayConfig;
    use dispatcher::{Dispatcher, DispatcherConfig};
    use filtering::LineFilter;
    use nsq_producer::NsqProducer;
    use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Accepts one producer connection and acks IDENTIFY plus every PUB.
    fn spawn_fake_nsqd(listener: TcpListener) -> JoinHandle<Vec<(String, Vec<u8>)>> {
        use tokio::io::AsyncBufReadExt;

        tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let (r, mut w) = stream.into_split();
            let mut reader = BufReader::new(r);

            let mut magic = [0u8; 4];
            reader.read_exact(&mut magic).await.unwrap();

            let mut publishes = Vec::new();
            let mut line = Vec::new();
            loop {
                line.clear();
                if reader.read_until(b'\n', &mut line).await.unwrap() == 0 {
                    break;
                }
                let cmd = String::from_utf8_lossy(&line).trim_end().to_string();
                let size = reader.read_u32().await.unwrap();
                let mut body = vec![0u8; size as usize];
                reader.read_exact(&mut body).await.unwrap();

                if let Some(topic) = cmd.strip_prefix("PUB ") {
                    publishes.push((topic.to_string(), body));
                }

                w.write_u32(6).await.unwrap();
                w.write_u32(0).await.unwrap();
                w.write_all(b"OK").await.unwrap();
                w.flush().await.unwrap();
            }
            publishes
        })
    }

    #[tokio::test]
    async fn test_relay_lines_into_fake_nsqd() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let server = spawn_fake_nsqd(listener);

        let cfg = RelayConfig {
            topic: "app-logs".to_string(),
            nsqd_addr: addr.clone(),
            contains: Some("!debug".to_string()),
            ..Default::default()
        };

        let producer = NsqProducer::connect(&addr).await.unwrap();
        let mut dispatcher = Dispatcher::new(
            DispatcherConfig::from_relay_config(&cfg),
            LineFilter::from_config(&cfg).unwrap(),
            producer,
        );

        assert_eq!(dispatcher.write(b"error: disk full").await.unwrap(), 16);
        assert_eq!(dispatcher.write(b"debug: noisy detail").await.unwrap(), 0);
        assert_eq!(dispatcher.write(b"warn: retrying").await.unwrap(), 14);

        dispatcher.stop().await.unwrap();

        let publishes = server.await.unwrap();
        assert_eq!(publishes.len(), 2);
        assert_eq!(
            publishes[0],
            ("app-logs".to_string(), b"error: disk full".to_vec())
        );
        assert_eq!(
            publishes[1],
            ("app-logs".to_string(), b"warn: retrying".to_vec())
        );
    }
}
