//! Frame codec for the stream transport.
//!
//! A frame is a 4-byte big-endian body length followed by a `bincode`
//! body. Each connection carries exactly one request frame and one response
//! frame.

use keeper_crypto::EncryptedPayload;
use keeper_sync::{TransportError, TransportResult};
use keeper_types::{Secret, SecretType};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Length prefix size.
pub const FRAME_HEADER_SIZE: usize = 4;

/// Largest body either side will send or accept.
pub const MAX_FRAME_SIZE: usize = 16 * 1024 * 1024;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Request {
    Save {
        token: String,
        name: String,
        secret_type: SecretType,
        payload: EncryptedPayload,
    },
    Get {
        token: String,
        name: String,
        secret_type: SecretType,
    },
    List {
        token: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Saved,
    Found(Secret),
    NotFound,
    Listed(Vec<Secret>),
    /// The server refused or failed the request.
    Failed(String),
}

pub fn encode<T: Serialize>(message: &T) -> TransportResult<Vec<u8>> {
    let body = bincode::serialize(message).map_err(|e| TransportError::Codec(e.to_string()))?;
    if body.len() > MAX_FRAME_SIZE {
        return Err(TransportError::FrameTooLarge {
            size: body.len(),
            limit: MAX_FRAME_SIZE,
        });
    }
    let mut frame = Vec::with_capacity(FRAME_HEADER_SIZE + body.len());
    frame.extend_from_slice(&(body.len() as u32).to_be_bytes());
    frame.extend_from_slice(&body);
    Ok(frame)
}

pub async fn write_frame<W, T>(writer: &mut W, message: &T) -> TransportResult<()>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let frame = encode(message)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

/// Reads one frame. The length is checked before any body byte is buffered.
pub async fn read_frame<R, T>(reader: &mut R) -> TransportResult<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut header = [0u8; FRAME_HEADER_SIZE];
    reader.read_exact(&mut header).await?;
    let size = u32::from_be_bytes(header) as usize;
    if size > MAX_FRAME_SIZE {
        return Err(TransportError::FrameTooLarge {
            size,
            limit: MAX_FRAME_SIZE,
        });
    }

    let mut body = vec![0u8; size];
    reader.read_exact(&mut body).await?;
    bincode::deserialize(&body).map_err(|e| TransportError::Codec(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn frame_has_big_endian_length_prefix() {
        let request = Request::List {
            token: "t".into(),
        };
        let frame = encode(&request).unwrap();
        let body_len = u32::from_be_bytes(frame[..4].try_into().unwrap()) as usize;
        assert_eq!(body_len, frame.len() - FRAME_HEADER_SIZE);

        let decoded: Request = read_frame(&mut &frame[..]).await.unwrap();
        assert_eq!(decoded, request);
    }

    #[tokio::test]
    async fn oversized_header_is_rejected_without_reading_body() {
        let header = ((MAX_FRAME_SIZE + 1) as u32).to_be_bytes();
        let err = read_frame::<_, Response>(&mut &header[..]).await.unwrap_err();
        assert!(matches!(
            err,
            TransportError::FrameTooLarge { size, limit }
                if size == MAX_FRAME_SIZE + 1 && limit == MAX_FRAME_SIZE
        ));
    }

    #[tokio::test]
    async fn truncated_body_is_an_io_error() {
        let mut frame = encode(&Response::Failed("boom".into())).unwrap();
        frame.truncate(frame.len() - 1);
        let err = read_frame::<_, Response>(&mut &frame[..]).await.unwrap_err();
        assert!(matches!(err, TransportError::Io(_)));
    }

    #[tokio::test]
    async fn garbage_body_is_a_codec_error() {
        let mut frame = 3u32.to_be_bytes().to_vec();
        frame.extend_from_slice(&[0xff, 0xff, 0xff]);
        let err = read_frame::<_, Response>(&mut &frame[..]).await.unwrap_err();
        assert!(matches!(err, TransportError::Codec(_)));
    }

    #[test]
    fn oversized_message_is_not_encoded() {
        let payload = EncryptedPayload {
            ciphertext: vec![0u8; MAX_FRAME_SIZE],
            wrapped_key: vec![],
        };
        let request = Request::Save {
            token: "t".into(),
            name: "big".into(),
            secret_type: SecretType::Binary,
            payload,
        };
        assert!(matches!(
            encode(&request),
            Err(TransportError::FrameTooLarge { .. })
        ));
    }
}
