//! Composite arithmetic gates.

/// Half adder: `(sum, carry)` of two bits.
pub fn half_adder(a: bool, b: bool) -> (bool, bool) {
    (a ^ b, a && b)
}

/// Full adder: `(sum, carry_out)` of two bits and a carry in.
pub fn full_adder(a: bool, b: bool, cin: bool) -> (bool, bool) {
    let partial = a ^ b;
    (partial ^ cin, (a && b) || (partial && cin))
}
