// Reed-Solomon error correction over GF(256)
//------------------------------------------------------------------------------

/// Computes the `ecc_count` error correction codewords for `block`.
///
/// The block is read as the coefficients of a message polynomial, highest degree
/// first, and the result is the remainder of `block(x) * x^ecc_count` divided by the
/// generator polynomial with roots `a^0 .. a^(ecc_count - 1)`, where `a = 2` generates
/// GF(256) modulo `x^8 + x^4 + x^3 + x^2 + 1`.
pub fn ecc(block: &[u8], ecc_count: usize) -> Vec<u8> {
    let len = block.len();
    let gen_poly = generator_polynomial(ecc_count);

    let mut res = block.to_vec();
    res.resize(len + ecc_count, 0);

    for i in 0..len {
        let lead_coeff = res[i];
        if lead_coeff == 0 {
            continue;
        }

        let log_lead_coeff = LOG_TABLE[lead_coeff as usize] as usize;
        for (u, &v) in res[i + 1..].iter_mut().zip(gen_poly.iter()) {
            let log_sum = (v as usize + log_lead_coeff) % 255;
            *u ^= EXP_TABLE[log_sum];
        }
    }

    res.split_off(len)
}

// Coefficients below the leading one, highest degree first, in log form
fn generator_polynomial(degree: usize) -> Vec<u8> {
    let mut poly = vec![1u8];
    for i in 0..degree {
        let root = EXP_TABLE[i % 255];
        let mut next = vec![0u8; poly.len() + 1];
        for (j, &c) in poly.iter().enumerate() {
            next[j] ^= c;
            next[j + 1] ^= gf_mul(c, root);
        }
        poly = next;
    }
    poly[1..].iter().map(|&c| LOG_TABLE[c as usize]).collect()
}

fn gf_mul(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let log_sum = (LOG_TABLE[a as usize] as usize + LOG_TABLE[b as usize] as usize) % 255;
    EXP_TABLE[log_sum]
}


// Global constants
//------------------------------------------------------------------------------

const fn build_exp_table() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut x: u16 = 1;
    let mut i = 0;
    while i < 256 {
        table[i] = x as u8;
        x <<= 1;
        if x & 0x100 != 0 {
            x ^= PRIMITIVE_POLYNOMIAL;
        }
        i += 1;
    }
    table
}

const fn build_log_table() -> [u8; 256] {
    let exp = build_exp_table();
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 255 {
        table[exp[i] as usize] = i as u8;
        i += 1;
    }
    table
}

// x^8 + x^4 + x^3 + x^2 + 1
const PRIMITIVE_POLYNOMIAL: u16 = 0x11D;

static EXP_TABLE: [u8; 256] = build_exp_table();

static LOG_TABLE: [u8; 256] = build_log_table();
