//! Model infrastructure
//!
//! Device and dtype selection, HuggingFace Hub downloads, tokenizer
//! wrapping, and the loaded seq2seq model handle.

pub mod device;
pub mod hub;
pub mod t5;
pub mod tokenizer;

pub use device::{select_device, select_dtype, DevicePreference};
pub use hub::{ModelLoader, ModelPath};
pub use t5::ModelHandle;
pub use tokenizer::TokenizerWrapper;
