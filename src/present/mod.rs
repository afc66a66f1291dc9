use crate::frame::{Frame, Presenter};
use crate::scene::SceneState;
use anyhow::Context;
use image::codecs::png::PngEncoder;
use image::{ColorType, ImageBuffer, ImageEncoder, Rgb, RgbImage};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

pub mod server;

pub use server::PreviewServer;

pub fn to_rgb8(frame: &Frame) -> RgbImage {
    ImageBuffer::from_fn(frame.width(), frame.height(), |x, y| {
        let p = frame.get_pixel(x, y);
        Rgb(p.0.map(|c| (c.clamp(0., 1.) * 255.).round() as u8))
    })
}

pub fn encode_png(frame: &Frame) -> anyhow::Result<Vec<u8>> {
    let img = to_rgb8(frame);
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgb8)
        .context("encoding frame as png")?;
    Ok(bytes)
}

pub fn save_png(frame: &Frame, path: &Path) -> anyhow::Result<()> {
    to_rgb8(frame)
        .save(path)
        .with_context(|| format!("writing {}", path.display()))
}

/// Writes every presented frame to `dir/frame_NNNNN.png`.
pub struct PngSequence {
    dir: PathBuf,
    next: u64,
}

impl PngSequence {
    pub fn create(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;
        info!("writing frames to {}", dir.display());
        Ok(PngSequence { dir, next: 0 })
    }

    pub fn path_for(&self, index: u64) -> PathBuf {
        self.dir.join(format!("frame_{:05}.png", index))
    }
}

impl Presenter for PngSequence {
    fn present(&mut self, frame: &Frame, _state: &SceneState) -> anyhow::Result<()> {
        let path = self.path_for(self.next);
        save_png(frame, &path)?;
        self.next += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Resolution;

    #[test]
    fn rgb8_conversion_scales_and_clamps() {
        let mut frame: Frame = ImageBuffer::new(2, 1);
        frame.put_pixel(0, 0, Rgb([0., 0.5, 0.25]));
        frame.put_pixel(1, 0, Rgb([1.5, -1., 1.]));
        let img = to_rgb8(&frame);
        assert_eq!(img.get_pixel(0, 0).0, [0, 128, 64]);
        assert_eq!(img.get_pixel(1, 0).0, [255, 0, 255]);
    }

    #[test]
    fn png_bytes_have_signature() {
        let frame: Frame = ImageBuffer::new(3, 2);
        let bytes = encode_png(&frame).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn sequence_numbers_files() {
        let dir = std::env::temp_dir().join(format!("backdrop-seq-{}", std::process::id()));
        let mut seq = PngSequence::create(&dir).unwrap();
        let frame: Frame = ImageBuffer::new(2, 2);
        let state = SceneState::new(Resolution::clamped(2, 2));
        seq.present(&frame, &state).unwrap();
        seq.present(&frame, &state).unwrap();
        assert!(dir.join("frame_00000.png").exists());
        assert!(dir.join("frame_00001.png").exists());
        fs::remove_dir_all(&dir).unwrap();
    }
}
