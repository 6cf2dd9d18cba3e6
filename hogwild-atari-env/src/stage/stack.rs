use crate::frame::FrameRing;
use anyhow::Result;
use hogwild_core::{error::HogwildError, record::Record, Env, Step};
use ndarray::{stack, Array, Axis, Dimension, RemoveAxis};
use std::fmt::Debug;

const STAGE: &str = "frame stacking";

/// Presents the most recent frames as one observation, oldest first.
///
/// At reset the stack is filled with the reset frame followed by no-op steps,
/// so it always holds exactly `depth` frames. The stack gains a leading axis
/// of length `depth`.
pub struct FrameStack<E: Env> {
    env: E,
    noop: usize,
    frames: FrameRing<E::Obs>,
}

impl<E, A, D> FrameStack<E>
where
    E: Env<Obs = Array<A, D>>,
    A: Clone + Debug,
    D: Dimension,
    D::Larger: RemoveAxis,
{
    /// Stacks `depth` frames. Fails if `env` has no no-op action.
    pub fn new(env: E, depth: usize) -> Result<Self> {
        if depth == 0 {
            return Err(HogwildError::InvalidConfig("stack depth must be at least 1".into()).into());
        }
        let noop = env
            .noop_action()
            .ok_or_else(|| HogwildError::NoopActionNotFound(env.action_meanings()))?;
        Ok(Self {
            env,
            noop,
            frames: FrameRing::new(depth),
        })
    }

    fn stacked(&self) -> Result<Array<A, D::Larger>> {
        let views: Vec<_> = self.frames.iter().map(|f| f.view()).collect();
        Ok(stack(Axis(0), &views)?)
    }
}

impl<E, A, D> Env for FrameStack<E>
where
    E: Env<Obs = Array<A, D>>,
    A: Clone + Debug,
    D: Dimension,
    D::Larger: RemoveAxis,
{
    type Obs = Array<A, D::Larger>;

    fn reset(&mut self) -> Result<Self::Obs> {
        self.frames.clear();
        let frame = self.env.reset()?;
        self.frames.push(frame);

        while !self.frames.is_full() {
            let (step, _) = self.env.step(self.noop)?;
            if step.is_done {
                return Err(HogwildError::DoneDuringReset { stage: STAGE }.into());
            }
            self.frames.push(step.obs);
        }

        self.stacked()
    }

    fn step(&mut self, act: usize) -> Result<(Step<Self::Obs>, Record)> {
        if !self.frames.is_full() {
            return Err(HogwildError::NotReset { stage: STAGE }.into());
        }
        let (step, record) = self.env.step(act)?;
        self.frames.push(step.obs);
        Ok((Step::new(self.stacked()?, step.reward, step.is_done), record))
    }

    fn action_meanings(&self) -> Vec<String> {
        self.env.action_meanings()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::test::MovingMarkerEnv;
    use ndarray::Array4;

    fn expected(first: usize) -> Array4<u8> {
        let frames: Vec<_> = (first..first + 4).map(MovingMarkerEnv::frame).collect();
        let views: Vec<_> = frames.iter().map(|f| f.view()).collect();
        stack(Axis(0), &views).unwrap()
    }

    #[test]
    fn test_frame_stack() -> Result<()> {
        let mut env = FrameStack::new(MovingMarkerEnv::new(), 4)?;

        let obs = env.reset()?;
        assert_eq!(obs.dim(), (4, 210, 160, 3));
        assert_eq!(obs, expected(0));

        assert_eq!(env.step(0)?.0.obs, expected(1));
        assert_eq!(env.step(0)?.0.obs, expected(2));

        assert_eq!(env.reset()?, expected(0));
        Ok(())
    }

    #[test]
    fn test_done_during_fill() -> Result<()> {
        let mut env = FrameStack::new(MovingMarkerEnv::new().done_at(3), 4)?;
        let err = env.reset().unwrap_err();
        assert_eq!(
            err.downcast_ref::<HogwildError>(),
            Some(&HogwildError::DoneDuringReset { stage: STAGE })
        );
        Ok(())
    }

    #[test]
    fn test_requires_noop() {
        let env = MovingMarkerEnv::new().action_meanings(&["UP"]);
        assert!(FrameStack::new(env, 4).is_err());
    }
}
