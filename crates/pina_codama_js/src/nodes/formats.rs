use codama_nodes::BytesEncoding;
use codama_nodes::Endian;
use codama_nodes::NestedTypeNode;
use codama_nodes::NumberFormat;
use codama_nodes::NumberTypeNode;

/// Serializer names and classification of number formats.
pub trait NumberFormatExt: Copy {
	/// The format as written in serializer names, `shortU16` included.
	fn as_str(self) -> &'static str;

	/// Formats that do not fit in a JavaScript `number` without precision
	/// loss.
	fn is_big(self) -> bool;

	fn is_integer(self) -> bool;

	fn is_unsigned_integer(self) -> bool;

	/// Single-byte and variable-length formats have no byte order.
	fn has_endianness(self) -> bool;
}

impl NumberFormatExt for NumberFormat {
	fn as_str(self) -> &'static str {
		match self {
			Self::U8 => "u8",
			Self::U16 => "u16",
			Self::U32 => "u32",
			Self::U64 => "u64",
			Self::U128 => "u128",
			Self::I8 => "i8",
			Self::I16 => "i16",
			Self::I32 => "i32",
			Self::I64 => "i64",
			Self::I128 => "i128",
			Self::F32 => "f32",
			Self::F64 => "f64",
			Self::ShortU16 => "shortU16",
		}
	}

	fn is_big(self) -> bool {
		matches!(self, Self::U64 | Self::U128 | Self::I64 | Self::I128)
	}

	fn is_integer(self) -> bool {
		!matches!(self, Self::F32 | Self::F64)
	}

	fn is_unsigned_integer(self) -> bool {
		matches!(
			self,
			Self::U8 | Self::U16 | Self::U32 | Self::U64 | Self::U128 | Self::ShortU16
		)
	}

	fn has_endianness(self) -> bool {
		!matches!(self, Self::U8 | Self::I8 | Self::ShortU16)
	}
}

pub trait BytesEncodingExt: Copy {
	/// The encoding as named by the Umi serializers.
	fn as_str(self) -> &'static str;
}

impl BytesEncodingExt for BytesEncoding {
	fn as_str(self) -> &'static str {
		match self {
			Self::Base16 => "base16",
			Self::Base58 => "base58",
			Self::Base64 => "base64",
			Self::Utf8 => "utf8",
		}
	}
}

/// Whether `size` is a bare `default` number that a serializer assumes when
/// no size option is given.
///
/// The byte order only matters for formats that have one, so a big-endian
/// `u8` is still the default `u8`.
pub fn is_default_number(size: &NestedTypeNode<NumberTypeNode>, default: NumberFormat) -> bool {
	let NestedTypeNode::Value(number) = size else {
		return false;
	};
	number.format == default && (number.endian == Endian::Little || !number.format.has_endianness())
}

#[cfg(test)]
mod tests {
	use codama_nodes::FixedSizeTypeNode;

	use super::*;

	#[test]
	fn single_byte_formats_ignore_endianness() {
		assert!(is_default_number(&NumberTypeNode::be(NumberFormat::U8).into(), NumberFormat::U8));
		assert!(is_default_number(&NumberTypeNode::le(NumberFormat::U8).into(), NumberFormat::U8));
		assert!(!is_default_number(&NumberTypeNode::be(NumberFormat::U32).into(), NumberFormat::U32));
		assert!(!is_default_number(&NumberTypeNode::le(NumberFormat::U16).into(), NumberFormat::U32));
	}

	#[test]
	fn wrapped_sizes_are_never_the_default() {
		let size = NestedTypeNode::FixedSize(FixedSizeTypeNode::new(
			NumberTypeNode::le(NumberFormat::U8),
			2,
		));

		assert!(!is_default_number(&size, NumberFormat::U8));
	}

	#[test]
	fn classifies_formats() {
		assert_eq!(NumberFormat::ShortU16.as_str(), "shortU16");
		assert!(NumberFormat::I64.is_big());
		assert!(!NumberFormat::F32.is_integer());
		assert!(!NumberFormat::I8.is_unsigned_integer());
		assert_eq!(BytesEncoding::Base58.as_str(), "base58");
	}
}
