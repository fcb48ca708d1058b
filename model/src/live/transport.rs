use anyhow::Result;
use futures::future::BoxFuture;
use futures::stream::{self, BoxStream, Stream, StreamExt};

/// Raw frames from an open connection. The stream ending means the connection closed.
pub type FrameStream = BoxStream<'static, Result<String>>;

/// A live feed that pushes `{"positions": [...]}` frames over a long-lived connection.
/// Dropping the returned stream releases the connection.
pub trait FeedTransport: Send + Sync + 'static {
    fn open(&self) -> BoxFuture<'_, Result<FrameStream>>;
}

/// A live feed that has to be asked for the current positions every time
pub trait PositionSource: Send + Sync + 'static {
    fn fetch(&self) -> BoxFuture<'_, Result<String>>;
}

/// Reads newline-delimited JSON frames from a streaming HTTP response.
pub struct HttpStreamTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpStreamTransport {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

impl FeedTransport for HttpStreamTransport {
    fn open(&self) -> BoxFuture<'_, Result<FrameStream>> {
        Box::pin(async move {
            let resp = self.client.get(&self.url).send().await?;
            if !resp.status().is_success() {
                bail!("{} returned {}", self.url, resp.status());
            }
            Ok(split_lines(resp.bytes_stream()))
        })
    }
}

pub struct HttpPoller {
    client: reqwest::Client,
    url: String,
}

impl HttpPoller {
    pub fn new(client: reqwest::Client, url: String) -> Self {
        Self { client, url }
    }
}

impl PositionSource for HttpPoller {
    fn fetch(&self) -> BoxFuture<'_, Result<String>> {
        Box::pin(async move {
            let resp = self.client.get(&self.url).send().await?;
            if !resp.status().is_success() {
                bail!("{} returned {}", self.url, resp.status());
            }
            Ok(resp.text().await?)
        })
    }
}

/// Regroups arbitrary chunks into one frame per line. Blank lines (keepalives) are skipped. A
/// read error is passed along once, then the stream ends.
pub fn split_lines<S, B, E>(chunks: S) -> FrameStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: std::error::Error + Send + Sync + 'static,
{
    let state = (Box::pin(chunks), Vec::new(), false);
    stream::unfold(state, |(mut chunks, mut buf, mut done)| async move {
        loop {
            if let Some(idx) = buf.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buf.drain(..=idx).collect();
                let line = String::from_utf8_lossy(&line).trim().to_string();
                if line.is_empty() {
                    continue;
                }
                return Some((Ok(line), (chunks, buf, done)));
            }
            if done {
                // Whatever's left after the connection closed without a trailing newline
                let line = String::from_utf8_lossy(&buf).trim().to_string();
                buf.clear();
                if line.is_empty() {
                    return None;
                }
                return Some((Ok(line), (chunks, buf, done)));
            }
            match chunks.next().await {
                Some(Ok(chunk)) => buf.extend_from_slice(chunk.as_ref()),
                Some(Err(err)) => {
                    buf.clear();
                    return Some((Err(anyhow::Error::new(err)), (chunks, buf, true)));
                }
                None => {
                    done = true;
                }
            }
        }
    })
    .boxed()
}

#[cfg(test)]
mod test {
    use super::*;

    fn chunks(
        parts: Vec<std::result::Result<&'static str, std::io::Error>>,
    ) -> FrameStream {
        split_lines(stream::iter(parts))
    }

    #[tokio::test]
    async fn test_split_lines_across_chunks() {
        let frames: Vec<String> = chunks(vec![
            Ok("{\"positions\""),
            Ok(": []}\n\n{\"pos"),
            Ok("itions\": [1]}\r\n  \n"),
            Ok("{\"tail\": true}"),
        ])
        .map(|x| x.unwrap())
        .collect()
        .await;
        assert_eq!(
            frames,
            vec![
                "{\"positions\": []}",
                "{\"positions\": [1]}",
                "{\"tail\": true}"
            ]
        );
    }

    #[tokio::test]
    async fn test_split_lines_error_ends_stream() {
        let results: Vec<Result<String>> = chunks(vec![
            Ok("a\nb"),
            Err(std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset")),
            Ok("never seen\n"),
        ])
        .collect()
        .await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().unwrap(), "a");
        assert!(results[1].is_err());
    }
}
