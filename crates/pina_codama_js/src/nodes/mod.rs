//! Helpers over the `codama_nodes` graph that the node crate does not carry
//! itself: format names, wrapper stripping and cross-program link lookup.

mod formats;
mod graph;
mod linkables;

pub use self::formats::BytesEncodingExt;
pub use self::formats::NumberFormatExt;
pub use self::formats::is_default_number;
pub use self::graph::all_programs;
pub use self::graph::instruction_data_struct;
pub use self::graph::is_scalar_enum;
pub use self::graph::resolve_nested;
pub use self::graph::seed_value_as_value;
pub use self::graph::variant_name;
pub use self::linkables::LinkableDictionary;
