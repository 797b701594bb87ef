//! Callbacks invoked when a timer fires.
//!
//! Any `FnMut()` closure is a [`TimerCallback`]. Callbacks that need to
//! control the timer that is firing them wrap an `FnMut(&mut FireContext)`
//! in [`WithContext`]; callbacks with arguments fixed at construction use
//! [`Bound`].

/// Control requests a callback may issue against its own timer.
///
/// The timer applies the request after the callback returns, so a pause
/// issued here stops an interval before it is re-armed.
#[derive(Debug, Default)]
pub struct FireContext {
    request: Option<FireRequest>,
}

/// A deferred control request. The last one issued wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FireRequest {
    Pause,
    Clear,
    Restart,
}

impl FireContext {
    pub(crate) fn new() -> Self {
        Self { request: None }
    }

    /// Pauses the timer once the callback returns.
    pub fn pause(&mut self) {
        self.request = Some(FireRequest::Pause);
    }

    /// Clears the timer once the callback returns.
    pub fn clear(&mut self) {
        self.request = Some(FireRequest::Clear);
    }

    /// Restarts the timer from a full delay once the callback returns.
    pub fn restart(&mut self) {
        self.request = Some(FireRequest::Restart);
    }

    /// Returns the pending request, if any.
    pub fn request(&self) -> Option<FireRequest> {
        self.request
    }

    pub(crate) fn take(&mut self) -> Option<FireRequest> {
        self.request.take()
    }
}

/// Action executed each time a timer fires.
pub trait TimerCallback {
    /// Runs the callback.
    fn on_fire(&mut self, ctx: &mut FireContext);
}

impl<F: FnMut()> TimerCallback for F {
    #[inline]
    fn on_fire(&mut self, _ctx: &mut FireContext) {
        self()
    }
}

/// Callback that receives the [`FireContext`] of the firing timer.
pub struct WithContext<F>(pub F);

impl<F: FnMut(&mut FireContext)> TimerCallback for WithContext<F> {
    #[inline]
    fn on_fire(&mut self, ctx: &mut FireContext) {
        (self.0)(ctx)
    }
}

/// Callback paired with arguments that are forwarded on every fire.
///
/// Use a tuple for several arguments:
///
/// ```
/// use pausable_timers::Bound;
///
/// let cb = Bound::new(|&(channel, value): &(u8, u32)| {
///     let _ = (channel, value);
/// }, (3, 123));
/// assert_eq!(cb.args(), &(3, 123));
/// ```
pub struct Bound<F, A> {
    callback: F,
    args: A,
}

impl<F, A> Bound<F, A>
where
    F: FnMut(&A),
{
    /// Binds `args` to `callback`.
    pub fn new(callback: F, args: A) -> Self {
        Self { callback, args }
    }

    /// The bound arguments.
    pub fn args(&self) -> &A {
        &self.args
    }

    /// Replaces the bound arguments. Takes effect from the next fire.
    pub fn set_args(&mut self, args: A) {
        self.args = args;
    }
}

impl<F, A> TimerCallback for Bound<F, A>
where
    F: FnMut(&A),
{
    #[inline]
    fn on_fire(&mut self, _ctx: &mut FireContext) {
        (self.callback)(&self.args)
    }
}
