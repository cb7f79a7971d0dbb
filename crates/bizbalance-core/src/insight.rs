//! Narrative insight requests: prompt building, the provider seam, and the
//! single-flight session that tracks the latest answer.

use std::{
    fmt::Write as _,
    sync::{
        mpsc::{self, Receiver, TryRecvError},
        Arc,
    },
    thread,
};

use thiserror::Error;
use tracing::{info, warn};

use crate::{bank_details, CalculationResult};

/// Text shown in place of an insight when the provider fails.
pub const INSIGHT_FAILURE_TEXT: &str =
    "Unable to generate insights at this time. Please try again later.";

#[derive(Debug, Error)]
pub enum InsightError {
    #[error("Please set a valid API_KEY in your environment to use this feature.")]
    MissingApiKey,
    #[error("an insight request is already in progress")]
    Busy,
    #[error("insight request failed: {0}")]
    Transport(String),
    #[error("insight service returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("insight response could not be decoded: {0}")]
    Decode(String),
    #[error("insight response contained no text")]
    EmptyResponse,
    #[error("insight worker failed: {0}")]
    Worker(String),
}

/// Snapshot of the figures an insight is generated from.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightRequest {
    pub bne: f64,
    pub bne_formula: String,
    pub total_ar: f64,
    pub total_ap: f64,
    pub total_credit: f64,
    pub total_bank: f64,
    pub net_receivables: f64,
    pub net_bank: f64,
    pub bank_details: String,
}

impl InsightRequest {
    pub fn from_result(result: &CalculationResult) -> Self {
        Self {
            bne: result.bne,
            bne_formula: result.bne_formula.clone(),
            total_ar: result.total_ar,
            total_ap: result.total_ap,
            total_credit: result.total_credit,
            total_bank: result.total_bank,
            net_receivables: result.net_receivables,
            net_bank: result.net_bank,
            bank_details: bank_details(result),
        }
    }

    pub fn prompt(&self) -> String {
        let mut prompt = String::new();
        let _ = writeln!(
            prompt,
            "You are a financial analyst reviewing the books of a small business."
        );
        let _ = writeln!(
            prompt,
            "Business Net Exact (BNE): ${:.2}, computed as {}.",
            self.bne, self.bne_formula
        );
        let _ = writeln!(prompt, "Accounts receivable (AR): ${:.2}", self.total_ar);
        let _ = writeln!(prompt, "Accounts payable (AP): ${:.2}", self.total_ap);
        let _ = writeln!(prompt, "Credit card balances (C): ${:.2}", self.total_credit);
        let bank_line = if self.bank_details.is_empty() {
            "none".to_string()
        } else {
            self.bank_details.clone()
        };
        let _ = writeln!(
            prompt,
            "Bank balances (B): ${:.2} ({})",
            self.total_bank, bank_line
        );
        let _ = writeln!(prompt, "Net receivables (AR - AP): ${:.2}", self.net_receivables);
        let _ = writeln!(prompt, "Net bank position (B - C): ${:.2}", self.net_bank);
        let _ = write!(
            prompt,
            "In under 150 words, assess this business's liquidity and solvency \
             and give one concrete recommendation."
        );
        prompt
    }
}

/// External text-generation backend.
pub trait InsightProvider: Send + Sync {
    /// False when the provider lacks a credential; no request is attempted then.
    fn is_configured(&self) -> bool {
        true
    }

    fn generate(&self, request: &InsightRequest) -> Result<String, InsightError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightStatus {
    Idle,
    Pending,
    Ready,
}

/// Tracks the single outstanding request and the most recent insight text.
///
/// The previous text stays readable while a new request is pending.
#[derive(Debug, Clone)]
pub struct InsightSession {
    status: InsightStatus,
    text: Option<String>,
}

impl InsightSession {
    pub fn new() -> Self {
        Self {
            status: InsightStatus::Idle,
            text: None,
        }
    }

    pub fn status(&self) -> InsightStatus {
        self.status
    }

    pub fn is_pending(&self) -> bool {
        self.status == InsightStatus::Pending
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Marks a request as outstanding, refusing when one already is.
    pub fn begin(&mut self) -> Result<(), InsightError> {
        if self.is_pending() {
            return Err(InsightError::Busy);
        }
        self.status = InsightStatus::Pending;
        Ok(())
    }

    /// Stores the outcome of the outstanding request, replacing earlier text.
    pub fn complete(&mut self, text: String) {
        self.text = Some(text);
        self.status = InsightStatus::Ready;
    }

    /// Maps a provider outcome to display text and completes the request.
    pub fn resolve(&mut self, outcome: Result<String, InsightError>) {
        match outcome {
            Ok(text) => {
                info!(chars = text.len(), "insight received");
                self.complete(text);
            }
            Err(err) => {
                warn!(error = %err, "insight generation failed");
                self.complete(INSIGHT_FAILURE_TEXT.to_string());
            }
        }
    }
}

impl Default for InsightSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs provider calls on a background thread, one at a time.
pub struct InsightWorker {
    provider: Arc<dyn InsightProvider>,
    inflight: Option<Receiver<Result<String, InsightError>>>,
}

impl InsightWorker {
    pub fn new(provider: Arc<dyn InsightProvider>) -> Self {
        Self {
            provider,
            inflight: None,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.is_configured()
    }

    /// Starts a request unless the credential is missing or one is in flight.
    pub fn request(
        &mut self,
        session: &mut InsightSession,
        request: InsightRequest,
    ) -> Result<(), InsightError> {
        if !self.provider.is_configured() {
            return Err(InsightError::MissingApiKey);
        }
        if session.is_pending() {
            return Err(InsightError::Busy);
        }
        let (tx, rx) = mpsc::channel();
        let provider = Arc::clone(&self.provider);
        thread::Builder::new()
            .name("bizbalance-insight".into())
            .spawn(move || {
                let outcome = provider.generate(&request);
                let _ = tx.send(outcome);
            })
            .map_err(|err| InsightError::Worker(err.to_string()))?;
        session.begin()?;
        self.inflight = Some(rx);
        info!("insight request dispatched");
        Ok(())
    }

    /// Moves a finished result into `session`. Returns true when one landed.
    pub fn poll(&mut self, session: &mut InsightSession) -> bool {
        let Some(rx) = self.inflight.as_ref() else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => {
                Err(InsightError::Worker("worker exited without a result".into()))
            }
        };
        self.inflight = None;
        session.resolve(outcome);
        true
    }

    /// Blocks until the outstanding request finishes. Returns false when idle.
    pub fn wait(&mut self, session: &mut InsightSession) -> bool {
        let Some(rx) = self.inflight.take() else {
            return false;
        };
        let outcome = rx
            .recv()
            .unwrap_or_else(|_| Err(InsightError::Worker("worker exited without a result".into())));
        session.resolve(outcome);
        true
    }
}
