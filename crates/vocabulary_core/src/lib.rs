pub mod domain;
pub mod ports;
pub mod scheduler;
pub mod session;
pub mod vocabulary;

pub use domain::{
    DueInfo, RecordState, ReviewResponse, ScheduledRecord, StudyQueue, StudyStats, Translation,
    VocabularyRecord,
};
pub use ports::{ItemStore, PortError, PortResult, TranslationService};
pub use scheduler::{apply_review, build_study_queue, compute_due_info, rank_for_study};
pub use session::StudySession;
pub use vocabulary::{
    check_record, NewVocabularyItem, SaveOutcome, VocabularyEdit, VocabularySort,
};
