//! Concrete DFT engines for the spectral cross-correlator.

mod direct;
mod fft;

pub use self::direct::DirectDft;
pub use self::fft::RustFftEngine;
