/// Watches a sampling loop and may steer it.
///
/// A driver hands every event it produces (an evaluated point, a failed model
/// call) to its observer. Returning `Some(action)` asks the driver to act,
/// for example to stop before the budget is spent; `None` leaves the loop
/// alone. The action type is chosen by the driver.
///
/// Any `FnMut(&E) -> Option<A>` closure is an observer, and `()` is the
/// observer that never acts.
pub trait Observer<E, A> {
    /// Inspects `event` and optionally requests an action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
