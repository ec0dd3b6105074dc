use super::Block;
use crate::error::ChainViolation;

/// Audit a stored chain: gapless indices from 0, hash integrity and linkage.
///
/// The genesis `previous_hash` is whatever the writer chose and is not checked.
/// An empty slice is a valid (empty) chain.
pub fn verify_chain(blocks: &[Block]) -> Result<(), ChainViolation> {
    for (position, block) in blocks.iter().enumerate() {
        let expected = position as u64;
        if block.index != expected {
            return Err(ChainViolation::IndexMismatch {
                expected,
                found: block.index,
            });
        }

        if !block.has_valid_hash() {
            return Err(ChainViolation::HashMismatch { index: block.index });
        }

        if position > 0 && block.previous_hash != blocks[position - 1].hash {
            return Err(ChainViolation::BrokenLink { index: block.index });
        }
    }

    Ok(())
}
