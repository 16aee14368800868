//! Render targets the demo timelines write into
//!
//! Segments only see local progress; they record it here and the widgets
//! read it back when drawing.

use std::cell::RefCell;
use std::rc::Rc;

pub type SharedStage<T> = Rc<RefCell<T>>;

/// Horizontal scroll position of the marquee, as a fraction of one pass
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct MarqueeStage {
    pub offset: f64,
}

/// Per-line reveal amount in [0, 1]
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RevealStage {
    amounts: Vec<f64>,
}

impl RevealStage {
    pub fn new(lines: usize) -> Self {
        Self {
            amounts: vec![0.0; lines],
        }
    }

    pub fn set(&mut self, line: usize, amount: f64) -> scrubline_core::Result<()> {
        let slot = self
            .amounts
            .get_mut(line)
            .ok_or_else(|| scrubline_core::Error::render(format!("no reveal line {}", line)))?;
        *slot = amount.clamp(0.0, 1.0);
        Ok(())
    }

    pub fn amount(&self, line: usize) -> f64 {
        self.amounts.get(line).copied().unwrap_or(0.0)
    }

    pub fn len(&self) -> usize {
        self.amounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reveal_stage_clamps_and_rejects_unknown_lines() {
        let mut stage = RevealStage::new(2);
        stage.set(0, 1.5).unwrap();
        stage.set(1, -0.2).unwrap();
        assert_eq!(stage.amount(0), 1.0);
        assert_eq!(stage.amount(1), 0.0);
        assert!(stage.set(2, 0.5).is_err());
        assert_eq!(stage.amount(7), 0.0);
    }
}
