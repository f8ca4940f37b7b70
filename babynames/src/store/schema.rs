//! Names table schema.
//!
//! ```text
//! Primary key:
//!   - name   (String, partition key), e.g. "Isla"
//!   - gender (String, sort key): "B" | "G"
//!
//! Global secondary index `bn_uuid_sort`:
//!   - gender (String, partition key)
//!   - uuid   (String, sort key): random hex, only used for sampling
//!
//! Attributes:
//!   - one map per year, e.g. "2019": {counted, rank, ...}
//! ```

pub const ATTR_NAME: &str = "name";

pub const ATTR_GENDER: &str = "gender";

pub const ATTR_UUID: &str = "uuid";

pub const UUID_INDEX: &str = "bn_uuid_sort";
