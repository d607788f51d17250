use crate::Tensor;
use sign_base::Frame;

/// Resize a frame to `size`x`size` and lay it out as a normalized NCHW
/// tensor `[1, 3, size, size]` with values in [0, 1].
///
/// Nearest-neighbor resampling; both models in this pipeline were
/// trained on inputs small enough that filtering makes no difference.
pub fn to_nchw(frame: &Frame, size: usize) -> Tensor {
    let (w, h) = (frame.width() as usize, frame.height() as usize);
    let data = frame.data();

    let mut nchw = vec![0.0f32; 3 * size * size];
    for out_y in 0..size {
        for out_x in 0..size {
            let src_x = (out_x * w / size).min(w - 1);
            let src_y = (out_y * h / size).min(h - 1);
            let src_idx = (src_y * w + src_x) * 3;
            for ch in 0..3 {
                let dst_idx = ch * size * size + out_y * size + out_x;
                nchw[dst_idx] = data[src_idx + ch] as f32 / 255.0;
            }
        }
    }

    // Shape is correct by construction
    Tensor {
        shape: vec![1, 3, size, size],
        data: nchw,
    }
}
