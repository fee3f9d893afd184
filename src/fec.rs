//! Systematic Reed-Solomon codec over GF(2^8).
//!
//! The bit-stream's error correction region is sized in bits, but the
//! code itself works on whole symbols: `parity_len` turns the region
//! size into a parity symbol count and any leftover bits stay zero as
//! filler, the same way QR codes park remainder bits. One shortened
//! RS(255) block covers the whole payload; the header field widths keep
//! `payload + parity` at or below 255 symbols.
//!
//! Field polynomial is `x^8 + x^4 + x^3 + x^2 + 1` (0x11D) with
//! generator element 2. Up to `nsym / 2` corrupted symbols are
//! correctable.

use std::sync::OnceLock;

use thiserror::Error;

/// Errors reported by the Reed-Solomon decoder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FecError {
    #[error("more errors than the parity budget can correct")]
    TooManyErrors,
    #[error("error locator does not match the received word")]
    Locator,
    #[error("corrected word still fails the syndrome check")]
    Verify,
}

struct Tables {
    exp: [u8; 512],
    log: [u8; 256],
}

fn tables() -> &'static Tables {
    static TABLES: OnceLock<Tables> = OnceLock::new();
    TABLES.get_or_init(|| {
        let mut exp = [0u8; 512];
        let mut log = [0u8; 256];
        let mut x: u16 = 1;
        for i in 0..255 {
            exp[i] = x as u8;
            log[x as usize] = i as u8;
            x <<= 1;
            if x & 0x100 != 0 {
                x ^= 0x11D;
            }
        }
        for i in 255..512 {
            exp[i] = exp[i - 255];
        }
        Tables { exp, log }
    })
}

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let t = tables();
    t.exp[t.log[a as usize] as usize + t.log[b as usize] as usize]
}

fn gf_div(a: u8, b: u8) -> u8 {
    assert!(b != 0, "division by zero in GF(256)");
    if a == 0 {
        return 0;
    }
    let t = tables();
    t.exp[t.log[a as usize] as usize + 255 - t.log[b as usize] as usize]
}

/// `2^power` for `power < 255`.
fn gf_exp(power: usize) -> u8 {
    tables().exp[power]
}

/// Number of parity symbols carried by an error correction region of
/// `ec_len_bits` bits next to a payload of `payload_len` bytes.
///
/// Encode and decode must derive this from the same two header values;
/// anything past `parity_len * 8` bits is zero filler.
pub fn parity_len(payload_len: usize, ec_len_bits: usize) -> usize {
    (ec_len_bits / 8).min(255usize.saturating_sub(payload_len))
}

/// Generator polynomial of degree `nsym`, highest coefficient first.
fn generator_poly(nsym: usize) -> Vec<u8> {
    let mut gen = vec![1u8];
    for i in 0..nsym {
        // gen * (x + 2^i)
        let root = gf_exp(i);
        let mut next = vec![0u8; gen.len() + 1];
        for (j, &g) in gen.iter().enumerate() {
            next[j] ^= g;
            next[j + 1] ^= gf_mul(g, root);
        }
        gen = next;
    }
    gen
}

/// Systematically encode `payload`, returning payload plus parity.
pub fn encode(payload: &[u8], ec_len_bits: usize) -> Vec<u8> {
    let nsym = parity_len(payload.len(), ec_len_bits);
    assert!(payload.len() + nsym <= 255, "codeword exceeds RS(255)");
    let mut out = Vec::with_capacity(payload.len() + nsym);
    out.extend_from_slice(payload);
    if nsym == 0 {
        return out;
    }
    let gen = generator_poly(nsym);
    // Shift-register division of payload * x^nsym by the generator; the
    // register ends up holding the remainder, which is the parity.
    let mut parity = vec![0u8; nsym];
    for &byte in payload {
        let factor = byte ^ parity[0];
        parity.rotate_left(1);
        parity[nsym - 1] = 0;
        if factor != 0 {
            for (j, p) in parity.iter_mut().enumerate() {
                *p ^= gf_mul(gen[j + 1], factor);
            }
        }
    }
    out.extend_from_slice(&parity);
    out
}

/// Syndrome `i` is the received polynomial evaluated at `2^i`.
fn syndromes(codeword: &[u8], nsym: usize) -> Vec<u8> {
    (0..nsym)
        .map(|i| {
            let x = gf_exp(i);
            codeword.iter().fold(0u8, |acc, &c| gf_mul(acc, x) ^ c)
        })
        .collect()
}

/// `lambda + coef * x^shift * other`, coefficients lowest-degree first.
fn add_scaled_shifted(lambda: &[u8], other: &[u8], coef: u8, shift: usize) -> Vec<u8> {
    let mut out = lambda.to_vec();
    if out.len() < other.len() + shift {
        out.resize(other.len() + shift, 0);
    }
    for (i, &o) in other.iter().enumerate() {
        out[i + shift] ^= gf_mul(coef, o);
    }
    out
}

/// Berlekamp-Massey: shortest LFSR (error locator, lowest-degree first)
/// generating the syndrome sequence.
fn error_locator(synd: &[u8], nsym: usize) -> Result<Vec<u8>, FecError> {
    let mut lambda = vec![1u8];
    let mut prev = vec![1u8];
    let mut l = 0usize;
    let mut shift = 1usize;
    let mut prev_delta = 1u8;
    for i in 0..nsym {
        let mut delta = synd[i];
        for j in 1..=l.min(lambda.len() - 1) {
            delta ^= gf_mul(lambda[j], synd[i - j]);
        }
        if delta == 0 {
            shift += 1;
        } else if 2 * l <= i {
            let keep = lambda.clone();
            lambda = add_scaled_shifted(&lambda, &prev, gf_div(delta, prev_delta), shift);
            l = i + 1 - l;
            prev = keep;
            prev_delta = delta;
            shift = 1;
        } else {
            lambda = add_scaled_shifted(&lambda, &prev, gf_div(delta, prev_delta), shift);
            shift += 1;
        }
    }
    while lambda.len() > 1 && lambda.last() == Some(&0) {
        lambda.pop();
    }
    if 2 * (lambda.len() - 1) > nsym {
        return Err(FecError::TooManyErrors);
    }
    Ok(lambda)
}

/// Chien search: roots of the locator give the error positions. Returns
/// `(codeword_index, x_k)` pairs where `x_k = 2^degree` of the error.
fn error_positions(lambda: &[u8], len: usize) -> Vec<(usize, u8)> {
    let mut found = Vec::new();
    for degree in 0..len {
        // lambda(x) vanishes at x = 2^-degree when an error sits at
        // that degree of the received polynomial.
        let x_inv = gf_exp(255 - degree % 255);
        let mut acc = 0u8;
        for &coef in lambda.iter().rev() {
            acc = gf_mul(acc, x_inv) ^ coef;
        }
        if acc == 0 {
            found.push((len - 1 - degree, gf_exp(degree)));
        }
    }
    found
}

/// Solve `sum_k e_k * x_k^i = synd[i]` for the error magnitudes by
/// Gaussian elimination over GF(256). The matrix is Vandermonde in the
/// distinct `x_k`, so a vanishing pivot means the locator was bogus.
fn error_magnitudes(synd: &[u8], xs: &[u8]) -> Result<Vec<u8>, FecError> {
    let t = xs.len();
    let mut mat = vec![vec![0u8; t + 1]; t];
    for (i, row) in mat.iter_mut().enumerate() {
        for (k, &x) in xs.iter().enumerate() {
            // x^i
            let mut p = 1u8;
            for _ in 0..i {
                p = gf_mul(p, x);
            }
            row[k] = p;
        }
        row[t] = synd[i];
    }
    for col in 0..t {
        let pivot = (col..t)
            .find(|&r| mat[r][col] != 0)
            .ok_or(FecError::Locator)?;
        mat.swap(col, pivot);
        for row in 0..t {
            if row != col && mat[row][col] != 0 {
                let factor = gf_div(mat[row][col], mat[col][col]);
                for c in col..=t {
                    let v = gf_mul(factor, mat[col][c]);
                    mat[row][c] ^= v;
                }
            }
        }
    }
    Ok((0..t).map(|k| gf_div(mat[k][t], mat[k][k])).collect())
}

/// Correct up to `nsym / 2` symbol errors in `codeword`, in place.
pub fn decode(codeword: &mut [u8], nsym: usize) -> Result<(), FecError> {
    if nsym == 0 {
        return Ok(());
    }
    let synd = syndromes(codeword, nsym);
    if synd.iter().all(|&s| s == 0) {
        return Ok(());
    }
    let lambda = error_locator(&synd, nsym)?;
    if lambda.len() == 1 {
        // Non-zero syndromes but a degree-zero locator.
        return Err(FecError::Locator);
    }
    let positions = error_positions(&lambda, codeword.len());
    if positions.len() != lambda.len() - 1 {
        return Err(FecError::Locator);
    }
    let xs: Vec<u8> = positions.iter().map(|&(_, x)| x).collect();
    let magnitudes = error_magnitudes(&synd, &xs)?;
    for (&(pos, _), &e) in positions.iter().zip(&magnitudes) {
        codeword[pos] ^= e;
    }
    if syndromes(codeword, nsym).iter().any(|&s| s != 0) {
        return Err(FecError::Verify);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_codeword_passes_through() {
        let data: Vec<u8> = (0..20).collect();
        let mut code = encode(&data, 64);
        assert_eq!(code.len(), 28);
        assert_eq!(&code[..20], &data[..]);
        decode(&mut code, 8).unwrap();
        assert_eq!(&code[..20], &data[..]);
    }

    #[test]
    fn corrects_all_double_errors() {
        // nsym = 4 corrects any 2 symbol errors; sweep every position
        // pair on a short word, same spirit as exhaustive Golay checks.
        let data: Vec<u8> = vec![0x12, 0x34, 0x56, 0x78, 0x9A, 0xBC, 0xDE, 0xF0];
        let clean = encode(&data, 32);
        for i in 0..clean.len() {
            for j in i..clean.len() {
                let mut rx = clean.clone();
                rx[i] ^= 0xA7;
                if j != i {
                    rx[j] ^= 0x3C;
                }
                decode(&mut rx, 4).unwrap();
                assert_eq!(rx, clean, "errors at {i},{j} not corrected");
            }
        }
    }

    #[test]
    fn never_returns_original_beyond_budget() {
        // Five errors against nsym = 8: the true codeword is more than
        // t = 4 away from the received word, so a successful decode can
        // only ever land on some other codeword.
        let data: Vec<u8> = (100..116).collect();
        let clean = encode(&data, 64);
        let mut rx = clean.clone();
        for pos in [0, 3, 7, 11, 19] {
            rx[pos] ^= 0x55;
        }
        match decode(&mut rx, 8) {
            Ok(()) => assert_ne!(rx, clean),
            Err(_) => {}
        }
    }

    #[test]
    fn zero_parity_is_a_no_op() {
        let data = vec![1u8, 2, 3];
        let code = encode(&data, 7);
        assert_eq!(code, data);
        let mut code = code;
        decode(&mut code, 0).unwrap();
    }

    #[test]
    fn parity_len_caps_at_block_size() {
        assert_eq!(parity_len(16, 70), 8);
        assert_eq!(parity_len(127, 2046), 128);
        assert_eq!(parity_len(250, 2046), 5);
    }
}
