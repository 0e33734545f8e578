//! Decoding many independent recordings.
//!
//! Each decode owns nothing but its own input slice, so buffers can be parsed
//! concurrently without coordination.  With the `parallel` feature the work
//! is spread over Rayon's global pool; otherwise it runs sequentially.
//! Results keep the order of the inputs either way.

use crate::document::EcgData;
use crate::error::Result;
use crate::reader::parse;

pub fn parse_batch(inputs: &[&[u8]]) -> Vec<Result<EcgData>> {
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        inputs.par_iter().map(|data| parse(data)).collect()
    }

    #[cfg(not(feature = "parallel"))]
    {
        inputs.iter().map(|data| parse(data)).collect()
    }
}
