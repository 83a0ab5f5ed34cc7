pub mod resume;

pub use resume::{
    Certification, Education, Entry, EntryId, Experience, PersonalInfo, RecordError,
    ResumeRecord, PLACEHOLDER_NAME,
};
