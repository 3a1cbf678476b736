#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub use apisign_core::*;

#[cfg(feature = "aws")]
pub mod aws {
    pub use apisign_aws_v4::*;
}
