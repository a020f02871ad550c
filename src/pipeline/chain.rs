//! Ordered validation chain with a terminal stage

use crate::channel::BroadcastReport;
use crate::command::DispatchCommand;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::metrics::PipelineMetrics;

use super::stage::{Rejection, StageOutcome, ValidationStage};
use super::stages::{HistoryStage, MinLengthStage, NonEmptyStage, PatternStage};

/// Status string returned by an accept-only chain
pub const SUCCESS_MESSAGE: &str = "Success";

/// Status string returned after delivery
pub const DELIVERED_MESSAGE: &str = "Message Sent!";

/// Terminal stage that delivers the command
#[derive(Debug, Clone, Copy, Default)]
pub struct DeliveryStage;

impl DeliveryStage {
    pub fn deliver(&self, command: &DispatchCommand) -> BroadcastReport {
        command.execute()
    }
}

/// What a chain does once every stage has passed
#[derive(Debug, Clone, Copy)]
pub enum Terminal {
    /// Report success without side effects
    Accept,
    /// Execute the command
    Deliver(DeliveryStage),
}

/// Result of handling a command
#[derive(Debug, Clone)]
pub enum ChainOutcome {
    Success,
    Delivered(BroadcastReport),
    Rejected(Rejection),
}

impl ChainOutcome {
    /// Plain-text status: "Success", "Message Sent!" or the rejection reason
    pub fn message(&self) -> &str {
        match self {
            ChainOutcome::Success => SUCCESS_MESSAGE,
            ChainOutcome::Delivered(_) => DELIVERED_MESSAGE,
            ChainOutcome::Rejected(rejection) => &rejection.reason,
        }
    }

    pub fn is_rejected(&self) -> bool {
        matches!(self, ChainOutcome::Rejected(_))
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ChainOutcome::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&BroadcastReport> {
        match self {
            ChainOutcome::Delivered(report) => Some(report),
            _ => None,
        }
    }
}

impl std::fmt::Display for ChainOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// An ordered sequence of stages owned by one chain.
///
/// `handle` always starts at the first stage and stops at the first rejection.
/// The chain is immutable once built and can be shared between threads.
pub struct ValidationChain {
    stages: Vec<Box<dyn ValidationStage>>,
    terminal: Terminal,
}

impl ValidationChain {
    pub fn builder() -> ChainBuilder {
        ChainBuilder::default()
    }

    /// Build the standard dispatch chain:
    /// non-empty, minimum length, history (if any), patterns in order, delivery.
    pub fn from_settings(config: &PipelineConfig) -> Result<Self> {
        let mut builder = Self::builder()
            .then(NonEmptyStage)
            .then(MinLengthStage::new(config.min_length));

        if !config.history.is_empty() {
            builder = builder.then(HistoryStage::new(config.history.iter().cloned()));
        }

        for pattern in &config.patterns {
            builder = builder.then(PatternStage::new(&pattern.name, &pattern.regex)?);
        }

        Ok(builder.deliver())
    }

    /// Run every predicate in order without reaching the terminal
    pub fn check(&self, payload: &str) -> std::result::Result<(), Rejection> {
        for (position, stage) in self.stages.iter().enumerate() {
            if let StageOutcome::Reject(reason) = stage.validate(payload) {
                tracing::debug!(stage = stage.name(), position, reason = %reason, "Stage rejected payload");
                return Err(Rejection {
                    stage: stage.name(),
                    reason,
                });
            }
        }
        Ok(())
    }

    /// Validate the command and, if every stage passes, run the terminal
    #[tracing::instrument(
        name = "chain.handle",
        skip(self, command),
        fields(channel = %command.channel_name(), stages = self.stages.len())
    )]
    pub fn handle(&self, command: &DispatchCommand) -> ChainOutcome {
        if let Err(rejection) = self.check(command.payload()) {
            PipelineMetrics::record_rejected(rejection.stage);
            return ChainOutcome::Rejected(rejection);
        }

        match self.terminal {
            Terminal::Accept => {
                PipelineMetrics::record_accepted();
                ChainOutcome::Success
            }
            Terminal::Deliver(stage) => {
                let report = stage.deliver(command);
                PipelineMetrics::record_delivered();
                ChainOutcome::Delivered(report)
            }
        }
    }

    /// Number of non-terminal stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn terminal(&self) -> Terminal {
        self.terminal
    }

    pub fn is_delivery(&self) -> bool {
        matches!(self.terminal, Terminal::Deliver(_))
    }
}

impl std::fmt::Debug for ValidationChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationChain")
            .field("stages", &self.stage_names())
            .field("terminal", &self.terminal)
            .finish()
    }
}

/// Fluent builder; stages run in the order they are appended
#[derive(Default)]
pub struct ChainBuilder {
    stages: Vec<Box<dyn ValidationStage>>,
}

impl ChainBuilder {
    /// Append a stage after the ones already linked
    pub fn then<S: ValidationStage + 'static>(self, stage: S) -> Self {
        self.then_boxed(Box::new(stage))
    }

    pub fn then_boxed(mut self, stage: Box<dyn ValidationStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Finish with a terminal that reports "Success"
    pub fn accept(self) -> ValidationChain {
        self.finish(Terminal::Accept)
    }

    /// Finish with a [`DeliveryStage`]
    pub fn deliver(self) -> ValidationChain {
        self.finish(Terminal::Deliver(DeliveryStage))
    }

    pub fn finish(self, terminal: Terminal) -> ValidationChain {
        ValidationChain {
            stages: self.stages,
            terminal,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::channel::Channel;
    use crate::config::PatternConfig;
    use crate::recipient::ChatUser;

    fn gardening() -> (Arc<Channel>, Arc<ChatUser>, Arc<ChatUser>) {
        let channel = Arc::new(Channel::new("Gardening group"));
        let jim = Arc::new(ChatUser::new("Jim"));
        let barb = Arc::new(ChatUser::new("Barb"));
        channel.join(jim.clone());
        channel.join(barb.clone());
        (channel, jim, barb)
    }

    fn send_chain() -> ValidationChain {
        ValidationChain::builder()
            .then(NonEmptyStage)
            .then(MinLengthStage::new(2))
            .deliver()
    }

    #[test]
    fn test_empty_payload_rejected_before_delivery() {
        let (channel, jim, barb) = gardening();
        let outcome = send_chain().handle(&DispatchCommand::new(channel, ""));

        assert_eq!(outcome.to_string(), "Please enter a value");
        assert_eq!(outcome.rejection().unwrap().stage, "non_empty");
        assert_eq!(jim.received_count() + barb.received_count(), 0);
    }

    #[test]
    fn test_short_payload_rejected() {
        let (channel, jim, _) = gardening();
        let outcome = send_chain().handle(&DispatchCommand::new(channel, "H"));

        assert_eq!(outcome.message(), "Please enter a value longer than 2");
        assert_eq!(outcome.rejection().unwrap().stage, "min_length");
        assert_eq!(jim.received_count(), 0);
    }

    #[test]
    fn test_valid_payload_delivered() {
        let (channel, jim, barb) = gardening();
        let outcome = send_chain().handle(&DispatchCommand::new(channel, "Hello everyone in group 1!"));

        assert_eq!(outcome.to_string(), "Message Sent!");
        assert_eq!(outcome.report().unwrap().notified, 2);
        assert_eq!(jim.inbox()[0].message, "Hello everyone in group 1!");
        assert_eq!(barb.inbox()[0].message, "Hello everyone in group 1!");
    }

    #[test]
    fn test_accept_terminal_returns_success() {
        let (channel, jim, _) = gardening();
        let chain = ValidationChain::builder().then(NonEmptyStage).accept();
        let outcome = chain.handle(&DispatchCommand::new(channel, "fine"));

        assert!(matches!(outcome, ChainOutcome::Success));
        assert_eq!(outcome.to_string(), "Success");
        assert_eq!(jim.received_count(), 0);
    }

    #[test]
    fn test_first_failure_wins() {
        // Both stages would fail on ""; only the first is reported
        let chain = ValidationChain::builder()
            .then(MinLengthStage::new(5))
            .then(NonEmptyStage)
            .accept();

        let rejection = chain.check("").unwrap_err();
        assert_eq!(rejection.stage, "min_length");
        assert_eq!(rejection.reason, "Please enter a value longer than 5");
    }

    #[test]
    fn test_empty_chain_goes_straight_to_terminal() {
        let (channel, jim, _) = gardening();
        let chain = ValidationChain::builder().deliver();
        assert!(chain.is_empty());

        let outcome = chain.handle(&DispatchCommand::new(channel, ""));
        assert_eq!(outcome.message(), DELIVERED_MESSAGE);
        assert_eq!(jim.received_count(), 1);
    }

    #[test]
    fn test_handle_is_repeatable() {
        let (channel, _, _) = gardening();
        let chain = send_chain();
        let command = DispatchCommand::new(channel, "H");

        let first = chain.handle(&command);
        let second = chain.handle(&command);
        assert_eq!(first.message(), second.message());
    }

    #[test]
    fn test_from_settings() {
        let config = PipelineConfig {
            min_length: 3,
            history: vec!["used@test.com".to_string()],
            patterns: vec![PatternConfig {
                name: "email address".to_string(),
                regex: r"\w+@\w+\.\w+".to_string(),
            }],
        };
        let chain = ValidationChain::from_settings(&config).unwrap();

        assert_eq!(
            chain.stage_names(),
            vec!["non_empty", "min_length", "history", "pattern"]
        );
        assert!(chain.is_delivery());
        assert_eq!(
            chain.check("used@test.com").unwrap_err().stage,
            "history"
        );
        assert_eq!(chain.check("shaun").unwrap_err().stage, "pattern");
        assert!(chain.check("new@test.com").is_ok());
    }

    #[test]
    fn test_from_settings_invalid_pattern() {
        let config = PipelineConfig {
            patterns: vec![PatternConfig {
                name: "broken".to_string(),
                regex: "[".to_string(),
            }],
            ..PipelineConfig::default()
        };
        assert!(matches!(
            ValidationChain::from_settings(&config),
            Err(crate::error::AppError::InvalidPattern(_))
        ));
    }
}
