//! Submission of the form to the classification service.

pub mod controller;
pub mod request;
pub mod transport;
pub mod types;

pub use controller::{ControllerEvent, StateTransition, SubmissionController};
pub use request::{FILE_PART, OutboundRequest, TEXT_PART};
pub use transport::{ClassifierTransport, HttpReply, HttpTransport, interpret_reply};
pub use types::{
    Classification, GENERIC_ERROR_MESSAGE, ProcessingResult, SubmissionEvent, SubmissionState,
    SubmissionToken, transition,
};
