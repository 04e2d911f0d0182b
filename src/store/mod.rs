pub mod keys;

mod financial;
mod generation;
mod identity;
mod submission;

pub use financial::{FinancialDraft, FinancialRecord, FinancialStore};
pub use generation::{
    DEFAULT_RECENT_LIMIT, DeckGeneration, DeckGenerationStore, GenerationDraft, GenerationPatch,
    GenerationStatus,
};
pub use identity::{IdentityStore, NewUser, Role, User, UserPatch};
pub use submission::{PeriodType, Submission, SubmissionDraft, SubmissionStore};

/// 存储层的类型化错误
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("邮箱已被注册: {0}")]
    DuplicateEmail(String),
    #[error("记录不存在: {0}")]
    NotFound(String),
}

/// 全部存储的句柄，进程启动时构造一次，随应用状态传入各 handler
#[derive(Default)]
pub struct Stores {
    pub users: IdentityStore,
    pub submissions: SubmissionStore,
    pub financials: FinancialStore,
    pub generations: DeckGenerationStore,
}

impl Stores {
    pub fn new() -> Self {
        Self::default()
    }
}
