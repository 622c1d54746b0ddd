mod percent;
mod picker_vm;
mod quiz_card_vm;
mod summary_vm;

pub use picker_vm::{
    DifficultyOptionVm, ReadyVm, SubjectCardVm, map_difficulty_options, map_ready,
    map_subject_cards,
};
pub use quiz_card_vm::{CardAction, OptionVm, ProgressVm, QuizCardVm, map_progress, map_quiz_card};
pub use summary_vm::{SummaryRowVm, SummaryVm, map_summary};
