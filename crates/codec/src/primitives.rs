use crate::{Codec, DecodeError};

fn read_array<const N: usize>(buf: &[u8], pos: &mut usize) -> Result<[u8; N], DecodeError> {
    let end = pos.checked_add(N).ok_or(DecodeError::UnexpectedEof)?;
    let bytes = buf.get(*pos..end).ok_or(DecodeError::UnexpectedEof)?;
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    *pos = end;
    Ok(out)
}

macro_rules! impl_codec_for_numeric {
    ($($ty:ty),*) => {
        $(
            impl Codec for $ty {
                fn encode(&self, buf: &mut Vec<u8>) {
                    buf.extend_from_slice(&self.to_le_bytes());
                }

                fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
                    Ok(<$ty>::from_le_bytes(read_array(buf, pos)?))
                }
            }
        )*
    };
}

impl_codec_for_numeric!(u32, u64, f32, f64);

// u32 element count, then the elements
impl<T: Codec> Codec for Vec<T> {
    fn encode(&self, buf: &mut Vec<u8>) {
        (self.len() as u32).encode(buf);
        for item in self {
            item.encode(buf);
        }
    }

    fn decode(buf: &[u8], pos: &mut usize) -> Result<Self, DecodeError> {
        let len = u32::decode(buf, pos)? as usize;
        let remaining = buf.len().saturating_sub(*pos);
        let mut vec = Vec::with_capacity(len.min(remaining));
        for _ in 0..len {
            vec.push(T::decode(buf, pos)?);
        }
        Ok(vec)
    }
}
