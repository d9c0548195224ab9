/// Leaves the reading view. Called after the session has stopped its timer.
pub trait Navigation: Send {
    fn back(&mut self);
}
