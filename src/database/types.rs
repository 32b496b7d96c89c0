use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Bits 0–7 of a tag: element width in bytes.
const WIDTH_MASK: u32 = 0x0000_00FF;
/// Bits 16–23 of a tag: signedness flag.
const SIGNED_SHIFT: u32 = 16;
/// Bits 24–31 of a tag: value class (integer, float, ASCII, UTF-8).
const CLASS_SHIFT: u32 = 24;

/// Closed set of primitive element kinds an item can hold.
///
/// The numeric value of each variant is persisted in every file record, so
/// the discriminants below are part of the on-disk format and never change.
/// A tag packs three orthogonal fields: element width, signedness and value
/// class; see [`TypeTag::from_parts`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u32)]
pub enum TypeTag {
    /// 8-bit ASCII characters.
    AsciiChar8 = 0x0200_0001,
    /// 8-bit UTF-8 code units.
    Utf8Char8 = 0x0300_0001,
    /// 8-bit unsigned integer.
    UInt8 = 0x0000_0001,
    /// 16-bit unsigned integer.
    UInt16 = 0x0000_0002,
    /// 32-bit unsigned integer.
    UInt32 = 0x0000_0004,
    /// 64-bit unsigned integer.
    UInt64 = 0x0000_0008,
    /// 8-bit signed twos-complement integer.
    Int8 = 0x0001_0001,
    /// 16-bit signed twos-complement integer.
    Int16 = 0x0001_0002,
    /// 32-bit signed twos-complement integer.
    Int32 = 0x0001_0004,
    /// 64-bit signed twos-complement integer.
    Int64 = 0x0001_0008,
    /// 32-bit IEEE-754 float.
    Float32 = 0x0101_0004,
    /// 64-bit IEEE-754 float.
    Float64 = 0x0101_0008,
}

/// Value class stored in the top byte of a [`TypeTag`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Integer,
    Float,
    Ascii,
    Utf8,
}

impl TypeTag {
    /// Every tag, in a fixed order.
    pub const ALL: [TypeTag; 12] = [
        TypeTag::AsciiChar8,
        TypeTag::Utf8Char8,
        TypeTag::UInt8,
        TypeTag::UInt16,
        TypeTag::UInt32,
        TypeTag::UInt64,
        TypeTag::Int8,
        TypeTag::Int16,
        TypeTag::Int32,
        TypeTag::Int64,
        TypeTag::Float32,
        TypeTag::Float64,
    ];

    /// Persisted numeric value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self as u32
    }

    /// Parses a persisted tag, returning `None` for values outside the set.
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::try_from(raw).ok()
    }

    /// Bytes per element: 1, 2, 4 or 8.
    #[inline]
    pub const fn element_width(self) -> usize {
        (self.raw() & WIDTH_MASK) as usize
    }

    /// `true` for the two character tags.
    #[inline]
    pub const fn is_text(self) -> bool {
        matches!(self, TypeTag::AsciiChar8 | TypeTag::Utf8Char8)
    }

    #[inline]
    pub const fn is_signed(self) -> bool {
        (self.raw() >> SIGNED_SHIFT) & 0xFF != 0
    }

    #[inline]
    pub const fn is_float(self) -> bool {
        matches!(self.class(), TypeClass::Float)
    }

    pub const fn class(self) -> TypeClass {
        match self.raw() >> CLASS_SHIFT {
            1 => TypeClass::Float,
            2 => TypeClass::Ascii,
            3 => TypeClass::Utf8,
            _ => TypeClass::Integer,
        }
    }

    /// Looks up the unique tag for a (width, signed, class) combination.
    ///
    /// Floats are always signed and text is always unsigned single-byte, so
    /// combinations outside the closed set yield `None`.
    pub fn from_parts(
        width: usize,
        signed: bool,
        class: TypeClass,
    ) -> Option<Self> {
        let class_bits: u32 = match class {
            TypeClass::Integer => 0,
            TypeClass::Float => 1,
            TypeClass::Ascii => 2,
            TypeClass::Utf8 => 3,
        };
        let width = u32::try_from(width).ok().filter(|w| *w <= WIDTH_MASK)?;
        let raw = (class_bits << CLASS_SHIFT) | ((signed as u32) << SIGNED_SHIFT) | width;
        Self::from_raw(raw)
    }

    /// Largest element count an item of this type may hold.
    ///
    /// The byte size of a record must fit a `u32`, so the limit shrinks with
    /// the element width.
    pub const fn max_count(self) -> usize {
        (u32::MAX as usize) / self.element_width()
    }
}

impl std::fmt::Display for TypeTag {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        let name = match self {
            TypeTag::AsciiChar8 => "ascii-char8",
            TypeTag::Utf8Char8 => "utf8-char8",
            TypeTag::UInt8 => "uint8",
            TypeTag::UInt16 => "uint16",
            TypeTag::UInt32 => "uint32",
            TypeTag::UInt64 => "uint64",
            TypeTag::Int8 => "int8",
            TypeTag::Int16 => "int16",
            TypeTag::Int32 => "int32",
            TypeTag::Int64 => "int64",
            TypeTag::Float32 => "float32",
            TypeTag::Float64 => "float64",
        };
        f.write_str(name)
    }
}

mod sealed {
    pub trait Sealed {}
}

/// A Rust primitive that maps one-to-one onto a numeric [`TypeTag`].
///
/// The trait is sealed: the set of element types is closed, exactly like the
/// tag set. Character data is stored as `u8` under the text tags and is
/// reached through the dedicated text accessors on `Item`.
pub trait PodElement: sealed::Sealed + Copy + PartialEq + std::fmt::Debug + 'static {
    /// Tag written for arrays of this element type.
    const TAG: TypeTag;

    /// Appends the host-order bytes of `values` to `out`.
    fn extend_ne_bytes(
        values: &[Self],
        out: &mut Vec<u8>,
    );

    /// Reads one element from a host-order chunk of exactly `TAG` width.
    fn from_ne_chunk(chunk: &[u8]) -> Self;
}

macro_rules! impl_pod_element {
    ($($ty:ty => $tag:ident),* $(,)?) => {
        $(
            impl sealed::Sealed for $ty {}

            impl PodElement for $ty {
                const TAG: TypeTag = TypeTag::$tag;

                fn extend_ne_bytes(
                    values: &[Self],
                    out: &mut Vec<u8>,
                ) {
                    out.reserve(std::mem::size_of_val(values));
                    for v in values {
                        out.extend_from_slice(&v.to_ne_bytes());
                    }
                }

                #[inline]
                fn from_ne_chunk(chunk: &[u8]) -> Self {
                    let mut buf = [0u8; std::mem::size_of::<$ty>()];
                    buf.copy_from_slice(chunk);
                    <$ty>::from_ne_bytes(buf)
                }
            }
        )*
    };
}

impl_pod_element!(
    u8 => UInt8,
    u16 => UInt16,
    u32 => UInt32,
    u64 => UInt64,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
);

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_raw_values_are_stable() {
        assert_eq!(TypeTag::AsciiChar8.raw(), 0x0200_0001);
        assert_eq!(TypeTag::Utf8Char8.raw(), 0x0300_0001);
        assert_eq!(TypeTag::UInt32.raw(), 4);
        assert_eq!(TypeTag::Int64.raw(), 0x0001_0008);
        assert_eq!(TypeTag::Float32.raw(), 0x0101_0004);
        assert_eq!(TypeTag::Float64.raw(), 0x0101_0008);
        let as_u32: u32 = TypeTag::Int16.into();
        assert_eq!(as_u32, 0x0001_0002);
    }

    #[test]
    fn test_widths_and_flags() {
        let widths: Vec<usize> = TypeTag::ALL.iter().map(|t| t.element_width()).collect();
        assert_eq!(widths, vec![1, 1, 1, 2, 4, 8, 1, 2, 4, 8, 4, 8]);

        assert!(TypeTag::AsciiChar8.is_text());
        assert!(TypeTag::Utf8Char8.is_text());
        assert!(!TypeTag::UInt8.is_text());

        assert!(TypeTag::Int8.is_signed());
        assert!(!TypeTag::UInt64.is_signed());
        assert!(TypeTag::Float32.is_float());
        assert!(TypeTag::Float32.is_signed());
        assert!(!TypeTag::Int32.is_float());
    }

    /// Each (width, signed, class) combination resolves to at most one tag and
    /// every tag is reachable from its own parts.
    #[test]
    fn test_from_parts_is_unique() {
        let mut seen = HashSet::new();
        for tag in TypeTag::ALL {
            let back = TypeTag::from_parts(tag.element_width(), tag.is_signed(), tag.class());
            assert_eq!(back, Some(tag));
            assert!(seen.insert((tag.element_width(), tag.is_signed(), tag.class())));
        }
        assert_eq!(TypeTag::from_parts(2, true, TypeClass::Float), None);
        assert_eq!(TypeTag::from_parts(3, false, TypeClass::Integer), None);
        assert_eq!(TypeTag::from_parts(1, true, TypeClass::Utf8), None);
    }

    #[test]
    fn test_from_raw_rejects_unknown() {
        assert_eq!(TypeTag::from_raw(0x0001_0004), Some(TypeTag::Int32));
        assert_eq!(TypeTag::from_raw(0), None);
        assert_eq!(TypeTag::from_raw(0x0000_0003), None);
        assert_eq!(TypeTag::from_raw(0x0401_0008), None);
    }

    #[test]
    fn test_max_count_by_width() {
        assert_eq!(TypeTag::UInt8.max_count(), u32::MAX as usize);
        assert_eq!(TypeTag::Int16.max_count(), (u32::MAX / 2) as usize);
        assert_eq!(TypeTag::Float64.max_count(), (u32::MAX / 8) as usize);
    }

    #[test]
    fn test_element_bytes_roundtrip_host_order() {
        let mut out = Vec::new();
        i32::extend_ne_bytes(&[-1, 7], &mut out);
        assert_eq!(out.len(), 8);
        assert_eq!(i32::from_ne_chunk(&out[..4]), -1);
        assert_eq!(i32::from_ne_chunk(&out[4..]), 7);
        assert_eq!(<f64 as PodElement>::TAG, TypeTag::Float64);
    }
}
