//! Application ledger: pair-unique entries tracked through a terminal-status
//! state machine.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{Application, ApplicationId, ApplicationStatus, Decision};
pub use repository::ApplicationRepository;
pub use router::application_router;
pub use service::ApplicationLedgerService;
