use super::{MetaError, Result};

/// Converts an axis index list into a boolean mask over `dims` axes.
pub fn axes_to_flags(axes: &[usize], dims: usize) -> Result<Vec<bool>> {
    let mut flags = vec![false; dims];
    for &axis in axes {
        let flag = flags
            .get_mut(axis)
            .ok_or(MetaError::AxisOutOfRange { axis, dims })?;
        if *flag {
            return Err(MetaError::DuplicateAxis { axis });
        }
        *flag = true;
    }
    Ok(flags)
}

/// Lists the set axes of a mask in ascending order.
pub fn flags_to_axes(flags: &[bool]) -> Vec<usize> {
    flags
        .iter()
        .enumerate()
        .filter_map(|(axis, flag)| flag.then_some(axis))
        .collect()
}

pub(crate) fn count_set(flags: &[bool]) -> usize {
    flags.iter().filter(|flag| **flag).count()
}

pub(crate) fn check_length(flags: &[bool], expected: usize) -> Result<()> {
    if flags.len() != expected {
        return Err(MetaError::MaskLengthMismatch {
            expected,
            actual: flags.len(),
        });
    }
    Ok(())
}
