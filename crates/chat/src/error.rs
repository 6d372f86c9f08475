use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ChatError {
    #[snafu(display("message text is empty after trimming whitespace on `{stage}`"))]
    EmptyText { stage: &'static str },
}

pub type ChatResult<T> = Result<T, ChatError>;
