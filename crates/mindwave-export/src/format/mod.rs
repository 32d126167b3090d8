//! Audio container encoders
//!
//! Only PCM WAV is produced; mp3 requests are written as 16-bit WAV.

pub mod wav;
