use crate::foundation::error::{CollageError, CollageResult};

/// Kernel radius used for a Gaussian of standard deviation `sigma`.
pub fn radius_for_sigma(sigma: f32) -> u32 {
    if !sigma.is_finite() || sigma <= 0.0 {
        return 0;
    }
    (sigma * 3.0).ceil() as u32
}

/// Separable Gaussian blur over an interleaved 8-bit buffer with `channels` channels per pixel.
///
/// Edges clamp to the nearest pixel. `sigma <= 0` returns a copy.
pub fn gaussian_blur(
    src: &[u8],
    width: u32,
    height: u32,
    channels: usize,
    sigma: f32,
) -> CollageResult<Vec<u8>> {
    let expected_len = (width as usize)
        .checked_mul(height as usize)
        .and_then(|v| v.checked_mul(channels))
        .ok_or_else(|| CollageError::validation("blur buffer size overflow"))?;
    if channels == 0 || src.len() != expected_len {
        return Err(CollageError::validation(
            "gaussian_blur expects src matching width*height*channels",
        ));
    }
    let radius = radius_for_sigma(sigma);
    if radius == 0 || width == 0 || height == 0 {
        return Ok(src.to_vec());
    }

    let kernel = gaussian_kernel_q16(radius, sigma)?;
    let mut tmp = vec![0u8; expected_len];
    let mut out = vec![0u8; expected_len];

    let geom = Geometry {
        width: width as i32,
        height: height as i32,
        channels,
    };
    horizontal_pass(src, &mut tmp, geom, &kernel);
    vertical_pass(&tmp, &mut out, geom, &kernel);
    Ok(out)
}

#[derive(Clone, Copy)]
struct Geometry {
    width: i32,
    height: i32,
    channels: usize,
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> CollageResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(CollageError::validation("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let mut weights_f = Vec::<f64>::with_capacity((2 * r + 1) as usize);
    let mut sum = 0.0f64;
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    for i in -r..=r {
        let x = f64::from(i);
        let w = (-x * x / denom).exp();
        weights_f.push(w);
        sum += w;
    }
    if sum <= 0.0 {
        return Err(CollageError::validation("gaussian kernel sum is zero"));
    }

    let mut weights = Vec::<u32>::with_capacity(weights_f.len());
    let mut acc: i64 = 0;
    for &wf in &weights_f {
        let q = ((wf / sum) * 65536.0).round() as i64;
        let q = q.clamp(0, 65536);
        weights.push(q as u32);
        acc += q;
    }
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        let new_mid = (i64::from(weights[mid]) + delta).clamp(0, 65536);
        weights[mid] = new_mid as u32;
    }

    Ok(weights)
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], g: Geometry, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let mut acc = vec![0u64; g.channels];
    for y in 0..g.height {
        for x in 0..g.width {
            acc.iter_mut().for_each(|a| *a = 0);
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki as i32 - radius).clamp(0, g.width - 1);
                let idx = (y * g.width + sx) as usize * g.channels;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (y * g.width + x) as usize * g.channels;
            for (c, a) in acc.iter().enumerate() {
                dst[out_idx + c] = q16_to_u8(*a);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], g: Geometry, k: &[u32]) {
    let radius = (k.len() / 2) as i32;
    let mut acc = vec![0u64; g.channels];
    for y in 0..g.height {
        for x in 0..g.width {
            acc.iter_mut().for_each(|a| *a = 0);
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki as i32 - radius).clamp(0, g.height - 1);
                let idx = (sy * g.width + x) as usize * g.channels;
                for (c, a) in acc.iter_mut().enumerate() {
                    *a += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out_idx = (y * g.width + x) as usize * g.channels;
            for (c, a) in acc.iter().enumerate() {
                dst[out_idx + c] = q16_to_u8(*a);
            }
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    let v = (acc + 32768) >> 16;
    v.min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/imaging/blur.rs"]
mod tests;
