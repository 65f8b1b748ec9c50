/// Control bits c1..c6 of a C-instruction, highest bit first
const ZX: u16 = 0b100000;
const NX: u16 = 0b010000;
const ZY: u16 = 0b001000;
const NY: u16 = 0b000100;
const F: u16 = 0b000010;
const NO: u16 = 0b000001;

/// Evaluate the ALU for the six control bits.
///
/// `x` is always D; `y` is A or RAM[A] depending on the a-bit, which the
/// caller has already applied.
pub fn compute(control: u16, x: u16, y: u16) -> u16 {
    let mut x = x;
    let mut y = y;

    if control & ZX != 0 {
        x = 0;
    }
    if control & NX != 0 {
        x = !x;
    }
    if control & ZY != 0 {
        y = 0;
    }
    if control & NY != 0 {
        y = !y;
    }

    let out = if control & F != 0 {
        x.wrapping_add(y)
    } else {
        x & y
    };

    if control & NO != 0 {
        !out
    } else {
        out
    }
}
