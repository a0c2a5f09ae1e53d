//! LZO1X-1 decompression.
//!
//! A pure-slice port of the classic `lzo1x_decompress` control flow,
//! including its historical quirks: the shortened first literal run, the
//! four match classes (M1–M4), the trailing two-bit literal counts carried
//! in the low bits of the previous instruction, and the `{0x11, 0x00,
//! 0x00}` end-of-stream marker.
//!
//! The caller supplies the expected output length; producing anything else
//! is an error. Input bytes after the end-of-stream marker are ignored,
//! because the enclosing AES layer pads the compressed stream to the
//! cipher's block size.

use crate::error::DecodeError;

/// Decoder position after a match: how the next instruction is interpreted.
enum State {
    /// Expect a literal-run instruction.
    LiteralRun,
    /// Expect the instruction following the first literal run, where short
    /// matches use the 0x801 distance base.
    FirstLiteralRun,
    /// A match instruction byte has been read.
    Match(u8),
    /// Copy this many trailing literals, then read a match instruction.
    MatchNext(usize),
}

/// Decompress `src` into exactly `expected_len` bytes.
pub(crate) fn decompress(src: &[u8], expected_len: usize) -> Result<Vec<u8>, DecodeError> {
    let mut out: Vec<u8> = Vec::with_capacity(expected_len);
    let mut ip = 0usize;

    macro_rules! fail {
        () => {
            return Err(DecodeError::LzoLength {
                expected: expected_len,
                actual: out.len(),
            })
        };
    }
    macro_rules! byte {
        () => {{
            match src.get(ip) {
                Some(&b) => {
                    ip += 1;
                    b
                }
                None => fail!(),
            }
        }};
    }
    macro_rules! copy_literals {
        ($n:expr) => {{
            let n: usize = $n;
            if ip + n > src.len() {
                fail!();
            }
            out.extend_from_slice(&src[ip..ip + n]);
            ip += n;
        }};
    }
    macro_rules! copy_match {
        ($dist:expr, $len:expr) => {{
            let dist: usize = $dist;
            let len: usize = $len;
            if dist == 0 || dist > out.len() {
                fail!();
            }
            // Byte-at-a-time: overlapping matches replicate recent output.
            let start = out.len() - dist;
            for k in 0..len {
                let b = out[start + k];
                out.push(b);
            }
        }};
    }
    // Extended run length: a sequence of zero bytes each worth 255, closed
    // by a nonzero byte.
    macro_rules! extend_run {
        ($base:expr) => {{
            let mut n: usize = $base;
            loop {
                let b = byte!();
                if b == 0 {
                    n += 255;
                } else {
                    n += b as usize;
                    break;
                }
            }
            n
        }};
    }

    let mut state = {
        let first = byte!();
        if first >= 18 {
            let t = (first - 17) as usize;
            if t < 4 {
                State::MatchNext(t)
            } else {
                copy_literals!(t);
                State::FirstLiteralRun
            }
        } else {
            ip = 0;
            State::LiteralRun
        }
    };

    loop {
        match state {
            State::LiteralRun => {
                let inst = byte!();
                if inst >= 16 {
                    state = State::Match(inst);
                    continue;
                }
                let run = if inst == 0 {
                    extend_run!(15)
                } else {
                    inst as usize
                };
                copy_literals!(run + 3);
                state = State::FirstLiteralRun;
            }
            State::FirstLiteralRun => {
                let inst = byte!();
                if inst >= 16 {
                    state = State::Match(inst);
                    continue;
                }
                // M1 after the first literal run: 2-byte encoding, distance
                // base 0x801, fixed 3-byte copy.
                let d = byte!() as usize;
                copy_match!(0x801 + ((inst as usize) >> 2) + (d << 2), 3);
                let tail = (src[ip - 2] & 3) as usize;
                state = if tail == 0 {
                    State::LiteralRun
                } else {
                    State::MatchNext(tail)
                };
            }
            State::Match(inst) => {
                if inst >= 64 {
                    // M2: short match, distance up to 2048.
                    let d = byte!() as usize;
                    let dist = 1 + (((inst as usize) >> 2) & 7) + (d << 3);
                    copy_match!(dist, ((inst as usize) >> 5) + 1);
                } else if inst >= 32 {
                    // M3: distance up to 16384, extensible length.
                    let len = match inst & 31 {
                        0 => extend_run!(31),
                        n => n as usize,
                    };
                    let lo = byte!() as usize;
                    let hi = byte!() as usize;
                    copy_match!(1 + ((lo | (hi << 8)) >> 2), len + 2);
                } else if inst >= 16 {
                    // M4: far match, or the end-of-stream marker when the
                    // distance bits are all zero.
                    let dist_high = ((inst as usize) & 8) << 11;
                    let len = match inst & 7 {
                        0 => extend_run!(7),
                        n => n as usize,
                    };
                    let lo = byte!() as usize;
                    let hi = byte!() as usize;
                    let dist = dist_high + ((lo | (hi << 8)) >> 2);
                    if dist == 0 {
                        break; // EOS
                    }
                    copy_match!(dist + 0x4000, len + 2);
                } else {
                    // M1 after a match's trailing literals: 2-byte copy.
                    let d = byte!() as usize;
                    copy_match!(1 + ((inst as usize) >> 2) + (d << 2), 2);
                }
                let tail = (src[ip - 2] & 3) as usize;
                state = if tail == 0 {
                    State::LiteralRun
                } else {
                    State::MatchNext(tail)
                };
            }
            State::MatchNext(n) => {
                copy_literals!(n);
                let inst = byte!();
                state = State::Match(inst);
            }
        }
    }

    if out.len() != expected_len {
        return Err(DecodeError::LzoLength {
            expected: expected_len,
            actual: out.len(),
        });
    }
    Ok(out)
}
