use std::marker::PhantomData;

use crate::action::Action;
use crate::pipeline::{BoxedAction, Pipeline};

/// Marker type for a builder with no actions.
pub struct Empty;

/// Marker type for a builder with at least one action.
pub struct Ready;

/// Type-state builder for [`Pipeline`]s.
///
/// All actions of a pipeline must agree on their services, context and error
/// types, and a pipeline cannot be built without at least one action.
///
/// Actions with a different context type are rejected at compile time:
///
/// ```compile_fail
/// use accounts_pipeline::{Action, PipelineBuilder};
///
/// struct CountUp;
/// impl Action for CountUp {
///     type Services = ();
///     type Context = i32;
///     type Error = ();
///     fn name(&self) -> &'static str { "count_up" }
///     fn forward(&self, _: &(), ctx: &mut i32) -> Result<(), ()> {
///         *ctx += 1;
///         Ok(())
///     }
/// }
///
/// struct PushChar;
/// impl Action for PushChar {
///     type Services = ();
///     type Context = String;
///     type Error = ();
///     fn name(&self) -> &'static str { "push_char" }
///     fn forward(&self, _: &(), ctx: &mut String) -> Result<(), ()> {
///         ctx.push('x');
///         Ok(())
///     }
/// }
///
/// let pipeline = PipelineBuilder::new().first(CountUp).then(PushChar).build();
/// ```
///
/// An empty pipeline cannot be built:
///
/// ```compile_fail
/// use accounts_pipeline::PipelineBuilder;
///
/// let pipeline = PipelineBuilder::<(), (), ()>::new().build();
/// ```
pub struct PipelineBuilder<S, C, E, State = Empty> {
    actions: Vec<BoxedAction<S, C, E>>,
    _state: PhantomData<State>,
}

impl<S, C, E> PipelineBuilder<S, C, E, Empty> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
            _state: PhantomData,
        }
    }

    /// Add the first action.
    #[must_use]
    pub fn first<A>(self, action: A) -> PipelineBuilder<S, C, E, Ready>
    where
        A: Action<Services = S, Context = C, Error = E> + 'static,
    {
        let mut actions = self.actions;
        actions.push(Box::new(action));
        PipelineBuilder {
            actions,
            _state: PhantomData,
        }
    }
}

impl<S, C, E> Default for PipelineBuilder<S, C, E, Empty> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, C, E> PipelineBuilder<S, C, E, Ready> {
    /// Append an action; it runs after every action added before it.
    #[must_use]
    pub fn then<A>(mut self, action: A) -> Self
    where
        A: Action<Services = S, Context = C, Error = E> + 'static,
    {
        self.actions.push(Box::new(action));
        self
    }

    #[must_use]
    pub fn build(self) -> Pipeline<S, C, E> {
        Pipeline::from_actions(self.actions)
    }
}
