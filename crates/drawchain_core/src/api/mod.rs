pub mod json_api;

pub use json_api::{
    evaluate_match_json, score_contribution_json, ContributionRequest, EvaluateRequest, PlayerData,
    RoundData, SubmissionData, SCHEMA_VERSION,
};
