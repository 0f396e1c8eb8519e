// tests/pipeline_load.rs
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use vol_area::app::pipeline::ChartPipeline;
use vol_area::data::{MemoryTransport, Transport};
use vol_area::domain::Palette;
use vol_area::error::{PipelineError, TransportError, ValueErrorKind};

const GOOD: &str = "Date,BTC,ETH\n2024-01-01,\"1,000\",500\n2024-02-01,\"2,000\",750\n";
const OTHER: &str = "Date,SOL\n2024-03-01,42\n";

/// Serves queued responses in order, each after its own delay.
struct Scripted {
    queue: Mutex<VecDeque<(u64, Option<&'static str>)>>,
}

impl Scripted {
    fn new(steps: Vec<(u64, Option<&'static str>)>) -> Self {
        Self {
            queue: Mutex::new(steps.into()),
        }
    }
}

#[async_trait]
impl Transport for Scripted {
    async fn fetch(&self) -> Result<String, TransportError> {
        let step = { self.queue.lock().unwrap().pop_front() };
        let (delay_ms, body) = step.unwrap_or((0, None));
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        body.map(str::to_string)
            .ok_or_else(|| TransportError::MissingSource("scripted failure".to_string()))
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

#[tokio::test]
async fn load_exposes_rows_times_categories() {
    let pipeline = ChartPipeline::new(MemoryTransport::new("mem", GOOD), Palette::default());
    let state = pipeline.load().await.unwrap();

    assert_eq!(state.long_series.len(), 4);
    assert_eq!(state.stats.len(), 2);
    assert_eq!(state.stats[0].total_value, 3_000.0);
    assert_eq!(state.stats[1].total_value, 1_250.0);
    assert_eq!(state.stats[0].color, Palette::DEFAULT_COLORS[0]);

    let f = pipeline.formatters();
    assert_eq!((f.value)(state.stats[0].total_value), "$3K");
    assert_eq!((f.date)(state.long_series[0].date), "Jan-2024");
}

#[tokio::test]
async fn failed_load_keeps_previous_state() {
    let pipeline = ChartPipeline::new(
        Scripted::new(vec![
            (0, Some(GOOD)),
            (0, None),
            (0, Some("Date,BTC\n2024-01-01,oops\n")),
        ]),
        Palette::default(),
    );

    let first = pipeline.load().await.unwrap();

    let err = pipeline.load().await.unwrap_err();
    assert!(matches!(err, PipelineError::Transport(_)), "{err:?}");
    assert_eq!(err.exit_code(), 4);
    assert_eq!(pipeline.state().as_deref(), Some(first.as_ref()));

    match pipeline.load().await {
        Err(PipelineError::Values(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].line, 2);
            assert_eq!(errors[0].column, "BTC");
            assert_eq!(errors[0].kind, ValueErrorKind::InvalidNumber);
        }
        other => panic!("expected value errors, got {other:?}"),
    }
    assert_eq!(pipeline.state().as_deref(), Some(first.as_ref()));
}

#[tokio::test]
async fn overlapping_loads_last_finisher_wins() {
    // The first request is slower, so it finishes last and overwrites the second.
    let pipeline = ChartPipeline::new(
        Scripted::new(vec![(30, Some(GOOD)), (0, Some(OTHER))]),
        Palette::default(),
    );

    let (slow, fast) = tokio::join!(pipeline.load(), pipeline.load());
    let slow = slow.unwrap();
    let fast = fast.unwrap();
    assert_eq!(fast.stats[0].category, "SOL");

    let published = pipeline.state().unwrap();
    assert_eq!(published.as_ref(), slow.as_ref());
    assert_eq!(published.stats[0].category, "BTC");
}

#[tokio::test]
async fn identical_input_gives_identical_state() {
    let a = ChartPipeline::new(MemoryTransport::new("a", GOOD), Palette::default())
        .load()
        .await
        .unwrap();
    let b = ChartPipeline::new(MemoryTransport::new("b", GOOD), Palette::default())
        .load()
        .await
        .unwrap();
    assert_eq!(a.long_series, b.long_series);
    assert_eq!(a.stats, b.stats);
}
