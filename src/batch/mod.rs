//! Bulk verification.
//!
//! [`Verifier::verify_batch`] runs the per-address pipeline on a fixed pool
//! of tokio tasks draining a shared cursor over the input. Domain facts are
//! shared through one [`DomainCache`] per batch; results come back in input
//! order whatever the completion order was.

mod error;
mod pipeline;
mod types;

pub use error::BatchError;
pub use types::{
    BatchOptions, BatchReport, CancelHandle, NoProgress, ProgressSink, VerificationResult,
};

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::config::VerifierConfig;
use crate::mx::{DomainCache, LookupMx, SystemResolver};
use crate::smtp_verify::{RecipientProber, SmtpProber};

use pipeline::Pipeline;

pub struct Verifier {
    pipeline: Arc<Pipeline>,
    workers: usize,
}

impl Verifier {
    /// Verifier talking to the system resolver and real SMTP servers.
    pub fn new(config: VerifierConfig) -> Result<Self, BatchError> {
        let resolver = Arc::new(SystemResolver::new(&config.dns));
        let prober = Arc::new(SmtpProber::new(config.smtp.clone()));
        Self::with_components(config, resolver, prober)
    }

    pub fn with_components(
        config: VerifierConfig,
        resolver: Arc<dyn LookupMx>,
        prober: Arc<dyn RecipientProber>,
    ) -> Result<Self, BatchError> {
        config.validate()?;
        let pipeline = Pipeline {
            heuristics: config.heuristic_sets(),
            typos: config.typo_table()?,
            policy: config.scoring.clone(),
            resolver,
            prober,
        };
        Ok(Self {
            pipeline: Arc::new(pipeline),
            workers: config.batch.workers,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Verifies a single address with a fresh domain cache.
    pub async fn verify_one(&self, address: &str, options: BatchOptions) -> VerificationResult {
        let cache = DomainCache::new();
        self.pipeline.verify(address, &cache, options.smtp).await
    }

    pub async fn verify_batch<I, P>(
        &self,
        addresses: I,
        options: BatchOptions,
        progress: &P,
        cancel: &CancelHandle,
    ) -> BatchReport
    where
        I: IntoIterator,
        I::Item: Into<String>,
        P: ProgressSink + ?Sized,
    {
        let inputs: Arc<[String]> = addresses.into_iter().map(Into::into).collect();
        let total = inputs.len();
        let pool = self.workers.min(total);
        info!(total, workers = pool, smtp = options.smtp, "starting verification batch");

        let cache = Arc::new(DomainCache::new());
        let cursor = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel::<(usize, VerificationResult)>();

        let mut workers = JoinSet::new();
        for _ in 0..pool {
            let pipeline = Arc::clone(&self.pipeline);
            let inputs = Arc::clone(&inputs);
            let cache = Arc::clone(&cache);
            let cursor = Arc::clone(&cursor);
            let cancel = cancel.clone();
            let tx = tx.clone();
            workers.spawn(async move {
                loop {
                    if cancel.is_cancelled() {
                        break;
                    }
                    let idx = cursor.fetch_add(1, Ordering::SeqCst);
                    let Some(raw) = inputs.get(idx) else {
                        break;
                    };
                    let verified = AssertUnwindSafe(pipeline.verify(raw, &cache, options.smtp))
                        .catch_unwind()
                        .await;
                    let result = match verified {
                        Ok(result) => result,
                        Err(payload) => {
                            let detail = panic_detail(payload.as_ref());
                            warn!(address = %raw, detail = %detail, "verification panicked");
                            pipeline.failure(raw, &detail)
                        }
                    };
                    if tx.send((idx, result)).is_err() {
                        break;
                    }
                }
            });
        }
        drop(tx);

        let mut slots: Vec<Option<VerificationResult>> = (0..total).map(|_| None).collect();
        let mut completed = 0;
        while let Some((idx, result)) = rx.recv().await {
            if let Some(slot) = slots.get_mut(idx) {
                *slot = Some(result);
                completed += 1;
                progress.on_progress(completed, total);
            }
        }
        while let Some(joined) = workers.join_next().await {
            if let Err(err) = joined {
                warn!(error = %err, "verification worker stopped");
            }
        }

        let cancelled = cancel.is_cancelled() && completed < total;
        if !cancelled && completed < total {
            // un worker est mort hors du catch_unwind : on comble les trous
            for (idx, slot) in slots.iter_mut().enumerate() {
                if slot.is_none() {
                    *slot = Some(self.pipeline.failure(&inputs[idx], "worker stopped"));
                }
            }
        }

        let results: Vec<VerificationResult> = slots.into_iter().flatten().collect();
        info!(total, completed = results.len(), cancelled, "verification batch finished");
        BatchReport {
            results,
            cancelled,
            total,
        }
    }
}

fn panic_detail(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "worker panicked".to_string()
    }
}
