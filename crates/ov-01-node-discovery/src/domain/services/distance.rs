//! Kademlia distance calculations.

use num_bigint::BigUint;

use crate::domain::NodeId;

/// Calculate the XOR distance between two NodeIds.
///
/// Both identifiers are read as big-endian unsigned integers and XOR-ed.
/// For operands of unequal length this is the same as zero-padding the
/// shorter one on the left (most-significant side): `0x01` and `0x0001`
/// are the same point, and `0x01` vs `0x0100` differ in the high byte.
///
/// # Properties
/// - Symmetric: `xor_distance(a, b) == xor_distance(b, a)`
/// - `xor_distance(a, a)` is zero
/// - Unbounded width, so no overflow
pub fn xor_distance(a: &NodeId, b: &NodeId) -> BigUint {
    BigUint::from_bytes_be(a.as_bytes()) ^ BigUint::from_bytes_be(b.as_bytes())
}
