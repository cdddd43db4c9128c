use chatrelay_core::pipeline::ReplyPipeline;

#[derive(Clone)]
pub struct AppState {
    pub pipeline: ReplyPipeline,
}
