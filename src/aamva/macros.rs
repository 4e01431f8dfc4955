macro_rules! field_catalog {
	($(#[$enum_meta:meta])* $vis:vis enum $enum_id:ident { $($(#[$meta:meta])* $id:ident : $tag:literal => $label:literal $(($jurisdiction_label:literal))?),* $(,)? }) => {
		$(#[$enum_meta])*
		#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
		$vis enum $enum_id {
			$($(#[$meta])* $id),*
		}

		impl $enum_id {
			pub const COUNT: usize = $crate::aamva::field_catalog!(@count $($id,)*);

			/// Every element, in canonical transcript order.
			pub const LIST: [Self; Self::COUNT] = [$(Self::$id),*];

			pub fn from_id(id: &[u8; 3]) -> Option<Self> {
				match id {
					$($tag => Some(Self::$id),)*
					_ => None
				}
			}

			pub fn from_code(code: &str) -> Option<Self> {
				let id: &[u8; 3] = code.as_bytes().try_into().ok()?;
				Self::from_id(id)
			}

			pub fn id(&self) -> &'static [u8; 3] {
				match self {
					$(Self::$id => $tag),*
				}
			}

			pub fn label(&self) -> &'static str {
				match self {
					$(Self::$id => $label),*
				}
			}

			pub fn jurisdiction_label(&self) -> Option<&'static str> {
				match self {
					$(Self::$id => $crate::aamva::field_catalog!(@label $($jurisdiction_label)?)),*
				}
			}
		}

		impl $enum_id {
			pub fn code(&self) -> &'static str {
				// SAFETY: every tag is an ASCII byte string literal.
				unsafe { std::str::from_utf8_unchecked(self.id()) }
			}
		}
	};
	(@count $a:ident, $($rest:ident,)*) => {
		1usize + $crate::aamva::field_catalog!(@count $($rest,)*)
	};
	(@count) => {
		0usize
	};
	(@label $label:literal) => {
		Some($label)
	};
	(@label) => {
		None
	}
}

pub(crate) use field_catalog;
