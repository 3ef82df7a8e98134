/// A member of a closed, ordered option set suitable for bit-packing.
///
/// Implementors are expected to be field-less enums. Every member must have a
/// distinct, stable ordinal, and `VARIANTS` must list all members in ordinal
/// order; `decode` walks that table, so a member missing from it is invisible
/// to the codec.
pub trait BitOption: Copy + Eq + 'static {
    /// All members of the option set, in ordinal order.
    const VARIANTS: &'static [Self];

    /// Stable index of this member within the set.
    ///
    /// Ordinals 64 and above do not fit in a 64-bit code; `encode` rejects
    /// them rather than letting the shift wrap.
    fn ordinal(self) -> u32;
}

/// Errors from bit-set encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("option ordinal {ordinal} does not fit in a 64-bit code")]
    OrdinalOutOfRange { ordinal: u32 },
}

/// Encode a set of options into a 64-bit code.
///
/// Sets bit `ordinal(o)` for every option in the input. The empty set encodes
/// to 0, and duplicate or reordered input changes nothing. Fails fast with
/// [`CodecError::OrdinalOutOfRange`] if any option reports an ordinal >= 64.
pub fn encode<E: BitOption>(options: impl IntoIterator<Item = E>) -> Result<u64, CodecError> {
    let mut code = 0u64;
    for option in options {
        let ordinal = option.ordinal();
        if ordinal >= u64::BITS {
            return Err(CodecError::OrdinalOutOfRange { ordinal });
        }
        code |= 1u64 << ordinal;
    }
    Ok(code)
}

/// Decode a 64-bit code back into the options whose bits are set.
///
/// Walks `E::VARIANTS` in order, so the result is sorted by ordinal. Bits
/// with no corresponding member are silently ignored: a code written by a
/// newer revision of the option set decodes to the members this revision
/// knows about. `decode(0)` is the empty set.
pub fn decode<E: BitOption>(code: u64) -> Vec<E> {
    E::VARIANTS
        .iter()
        .copied()
        .filter(|option| {
            let ordinal = option.ordinal();
            ordinal < u64::BITS && code & (1u64 << ordinal) != 0
        })
        .collect()
}
