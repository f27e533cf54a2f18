use std::{
    pin::Pin,
    task::{Context, Poll},
    time::Duration,
};

use async_trait::async_trait;
use futures_core::Stream;
use tokio::{sync::mpsc, task::JoinHandle, time::sleep};
use tokio_util::sync::{CancellationToken, DropGuard};

use crate::{api::Api, prelude::*, summary::Summary};

/// Anything that can produce a fresh [`Summary`] on demand.
#[async_trait]
pub trait SummarySource: Send + Sync + 'static {
    async fn get_summary(&self) -> Result<Summary>;
}

#[async_trait]
impl SummarySource for Api {
    async fn get_summary(&self) -> Result<Summary> {
        Self::get_summary(self).await
    }
}

/// Summaries produced by a background polling task.
///
/// The task stops on the first failed fetch, on cancellation, or once the stream is dropped.
/// After the stream ends, [`SummaryStream::finish`] tells why.
#[must_use]
pub struct SummaryStream {
    receiver: mpsc::Receiver<Summary>,
    task: JoinHandle<Result>,
    cancellation: CancellationToken,
    _drop_guard: DropGuard,
}

impl SummaryStream {
    /// Start polling `source` every `interval` until `cancellation` is cancelled.
    ///
    /// Must be called within a Tokio runtime.
    pub fn spawn<S: SummarySource>(
        source: S,
        interval: Duration,
        cancellation: CancellationToken,
    ) -> Self {
        let (sender, receiver) = mpsc::channel(1);
        let task = tokio::spawn(run(source, interval, sender, cancellation.clone()));
        Self { receiver, task, _drop_guard: cancellation.clone().drop_guard(), cancellation }
    }

    /// Wait for the next summary. Returns [`None`] once the polling task has stopped
    /// and all the received summaries have been consumed.
    pub async fn next_summary(&mut self) -> Option<Summary> {
        self.receiver.recv().await
    }

    /// Ask the polling task to stop.
    pub fn cancel(&self) {
        self.cancellation.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the polling task, if still running, and return its outcome.
    ///
    /// # Errors
    ///
    /// Returns the error that terminated the stream, if any.
    pub async fn finish(self) -> Result {
        let Self { receiver, task, cancellation, _drop_guard } = self;
        drop(receiver);
        cancellation.cancel();
        match task.await {
            Ok(result) => result,
            Err(error) if error.is_panic() => std::panic::resume_unwind(error.into_panic()),
            Err(_) => Ok(()),
        }
    }
}

impl Stream for SummaryStream {
    type Item = Summary;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

#[instrument(skip_all, fields(interval = ?interval))]
async fn run<S: SummarySource>(
    source: S,
    interval: Duration,
    sender: mpsc::Sender<Summary>,
    cancellation: CancellationToken,
) -> Result {
    loop {
        let summary = tokio::select! {
            biased;
            () = cancellation.cancelled() => break,
            result = source.get_summary() => match result {
                Ok(summary) => summary,
                Err(error) => {
                    error!("failed to poll the summary: {error}");
                    return Err(error);
                }
            },
        };

        // Blocks while the previous summary is still unread.
        tokio::select! {
            biased;
            () = cancellation.cancelled() => break,
            result = sender.send(summary) => if result.is_err() {
                info!("the receiver is gone");
                break;
            },
        }

        tokio::select! {
            biased;
            () = cancellation.cancelled() => break,
            () = sender.closed() => {
                info!("the receiver is gone");
                break;
            }
            () = sleep(interval) => {}
        }
    }
    info!("stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    };

    use http::StatusCode;
    use tokio::time::Instant;

    use super::*;
    use crate::{error::Endpoint, quantity::Watts};

    /// Succeeds `n_successes` times, then fails forever.
    struct MockSource {
        n_successes: u64,
        latency: Duration,
        n_calls: Arc<AtomicU64>,
    }

    impl MockSource {
        fn new(n_successes: u64, latency: Duration) -> (Self, Arc<AtomicU64>) {
            let n_calls = Arc::new(AtomicU64::new(0));
            (Self { n_successes, latency, n_calls: Arc::clone(&n_calls) }, n_calls)
        }
    }

    #[async_trait]
    impl SummarySource for MockSource {
        async fn get_summary(&self) -> Result<Summary> {
            sleep(self.latency).await;
            let call = self.n_calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call <= self.n_successes {
                Ok(Summary { current_power: Watts(call), ..Summary::default() })
            } else {
                Err(Error::status(Endpoint::Summary, StatusCode::SERVICE_UNAVAILABLE))
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn emits_until_first_error() {
        const INTERVAL: Duration = Duration::from_secs(60);
        const LATENCY: Duration = Duration::from_secs(2);

        let (source, n_calls) = MockSource::new(3, LATENCY);
        let mut stream = SummaryStream::spawn(source, INTERVAL, CancellationToken::new());

        let mut powers = Vec::new();
        let mut last_received_at: Option<Instant> = None;
        while let Some(summary) = stream.next_summary().await {
            let now = Instant::now();
            if let Some(last_received_at) = last_received_at {
                assert!(now - last_received_at >= INTERVAL + LATENCY);
            }
            last_received_at = Some(now);
            powers.push(summary.current_power);
        }

        assert_eq!(powers, [Watts(1), Watts(2), Watts(3)]);
        assert_eq!(n_calls.load(Ordering::SeqCst), 4);
        let result = stream.finish().await;
        assert!(matches!(result, Err(Error::RequestFailed { .. })), "{result:?}");
    }

    #[tokio::test(start_paused = true)]
    async fn stops_while_sleeping_when_cancelled() {
        let (source, n_calls) = MockSource::new(u64::MAX, Duration::ZERO);
        let cancellation = CancellationToken::new();
        let mut stream =
            SummaryStream::spawn(source, Duration::from_secs(300), cancellation.child_token());

        assert_eq!(stream.next_summary().await.map(|summary| summary.current_power), Some(Watts(1)));
        cancellation.cancel();
        assert!(stream.next_summary().await.is_none());
        assert_eq!(n_calls.load(Ordering::SeqCst), 1);
        assert!(stream.finish().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_consumer_does_not_read() {
        let (source, n_calls) = MockSource::new(u64::MAX, Duration::ZERO);
        let mut stream = SummaryStream::spawn(source, Duration::ZERO, CancellationToken::new());

        // Let the task fill the channel and block on the next hand-off.
        sleep(Duration::from_secs(1)).await;
        assert_eq!(n_calls.load(Ordering::SeqCst), 2);
        assert!(!stream.is_finished());

        stream.cancel();
        assert!(stream.next_summary().await.is_some());
        assert!(stream.next_summary().await.is_none());
        assert!(stream.finish().await.is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn stops_when_dropped() {
        const INTERVAL: Duration = Duration::from_secs(60);

        let (source, n_calls) = MockSource::new(u64::MAX, Duration::ZERO);
        let mut stream = SummaryStream::spawn(source, INTERVAL, CancellationToken::new());
        assert!(stream.next_summary().await.is_some());
        drop(stream);

        sleep(INTERVAL * 10).await;
        assert_eq!(n_calls.load(Ordering::SeqCst), 1);
    }
}
