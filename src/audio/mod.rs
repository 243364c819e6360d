pub mod decode;
pub mod descriptors;
pub mod features;
