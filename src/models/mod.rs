// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    DenyEntry, DuplicatePolicy, Gender, HistoryRecord, MatchParams, MatchReport, Pair, Person,
    UnknownGenderPolicy, DEFAULT_MAX_ITERATIONS, DEFAULT_THRESHOLD,
};
pub use requests::MakeMatchesRequest;
pub use responses::{ErrorResponse, HealthResponse, MakeMatchesResponse};
