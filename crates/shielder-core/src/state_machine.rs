use serde::{Deserialize, Serialize};

use crate::ports::PortError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityStage {
    /// Submitted locally, no chain hash yet.
    Pending,
    /// Observed on chain.
    Confirmed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityAction {
    AttachTxHash,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTransition {
    pub from: ActivityStage,
    pub to: ActivityStage,
    pub reason: &'static str,
}

pub fn activity_transition(
    stage: ActivityStage,
    action: ActivityAction,
) -> Result<(ActivityStage, StageTransition), PortError> {
    match (stage, action) {
        (ActivityStage::Pending, ActivityAction::AttachTxHash) => Ok((
            ActivityStage::Confirmed,
            StageTransition {
                from: stage,
                to: ActivityStage::Confirmed,
                reason: "tx hash observed on chain",
            },
        )),
        (from, action) => Err(PortError::Validation(format!(
            "illegal activity transition: {from:?} --{action:?}-->"
        ))),
    }
}
