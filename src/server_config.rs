use std::path::Path;

pub const CONFIG_FILE_NAME: &str = "mediamtx.yml";

/// Placeholder host in the printed URLs
pub const DEFAULT_HOST: &str = "<Mac_IP>";

pub const HLS_SEGMENT_COUNT: u32 = 6;
pub const HLS_SEGMENT_DURATION: &str = "1s";
pub const HLS_PART_DURATION: &str = "200ms";

/// The four parameters mediamtx is started with.
///
/// Values are not checked; a bad port or path name is written out as-is and
/// left for mediamtx to reject.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    http_port: i64,
    rtmp_port: i64,
    path_name: String,
    stream_name: String,
}

impl ServerConfig {
    pub fn new(
        http_port: i64,
        rtmp_port: i64,
        path_name: impl Into<String>,
        stream_name: impl Into<String>,
    ) -> Self {
        Self {
            http_port,
            rtmp_port,
            path_name: path_name.into(),
            stream_name: stream_name.into(),
        }
    }

    /// Renders the mediamtx YAML: RTMP and HLS listeners plus one publisher path
    pub fn render(&self) -> String {
        let Self {
            http_port,
            rtmp_port,
            path_name,
            ..
        } = self;

        format!(
            "rtmp:
  enabled: yes
  address: :{rtmp_port}

hls:
  enabled: yes
  address: :{http_port}

paths:
  {path_name}:
    source: publisher
    hlsSegmentCount: {HLS_SEGMENT_COUNT}
    hlsSegmentDuration: {HLS_SEGMENT_DURATION}
    hlsPartDuration: {HLS_PART_DURATION}
"
        )
    }

    /// Writes the rendered config, replacing whatever is at `path`
    pub async fn write_to(&self, path: &Path) -> std::io::Result<()> {
        tokio::fs::write(path, self.render()).await
    }

    pub fn publish_url(&self, host: &str) -> String {
        format!(
            "rtmp://{host}:{}/{}/{}",
            self.rtmp_port, self.path_name, self.stream_name
        )
    }

    pub fn play_url(&self, host: &str) -> String {
        format!(
            "http://{host}:{}/{}/{}/index.m3u8",
            self.http_port, self.path_name, self.stream_name
        )
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(8080, 1935, "live", "stream")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEFAULT_RENDERED: &str = "rtmp:
  enabled: yes
  address: :1935

hls:
  enabled: yes
  address: :8080

paths:
  live:
    source: publisher
    hlsSegmentCount: 6
    hlsSegmentDuration: 1s
    hlsPartDuration: 200ms
";

    /// Entries directly below `paths:`
    fn path_entries(rendered: &str) -> Vec<&str> {
        rendered
            .lines()
            .skip_while(|line| *line != "paths:")
            .skip(1)
            .filter(|line| line.starts_with("  ") && !line.starts_with("   "))
            .map(|line| line.trim().trim_end_matches(':'))
            .collect()
    }

    fn section_address<'a>(rendered: &'a str, section: &str) -> Option<&'a str> {
        rendered
            .lines()
            .skip_while(|line| *line != format!("{section}:"))
            .take_while(|line| !line.is_empty())
            .find_map(|line| line.trim().strip_prefix("address: "))
    }

    #[test]
    fn test_render_defaults() {
        assert_eq!(ServerConfig::default().render(), DEFAULT_RENDERED);
    }

    #[test]
    fn test_render_single_path_and_addresses() {
        let cases = [
            (8080, 1935, "live", "stream"),
            (80, 19350, "cam-1", "front"),
            (0, 65535, "a/b", "x"),
            (70000, -1, "live", "stream"),
            (443, 1, "app", ""),
        ];

        for (port, rtmp, path, stream) in cases {
            let rendered = ServerConfig::new(port, rtmp, path, stream).render();
            assert_eq!(path_entries(&rendered), vec![path], "{rendered}");
            assert_eq!(
                section_address(&rendered, "rtmp"),
                Some(format!(":{rtmp}").as_str())
            );
            assert_eq!(
                section_address(&rendered, "hls"),
                Some(format!(":{port}").as_str())
            );
        }
    }

    #[test]
    fn test_urls() {
        let config = ServerConfig::default();
        assert_eq!(
            config.publish_url(DEFAULT_HOST),
            "rtmp://<Mac_IP>:1935/live/stream"
        );
        assert_eq!(
            config.play_url(DEFAULT_HOST),
            "http://<Mac_IP>:8080/live/stream/index.m3u8"
        );

        let config = ServerConfig::new(9000, 2935, "app", "cam");
        assert_eq!(
            config.publish_url("192.168.1.20"),
            "rtmp://192.168.1.20:2935/app/cam"
        );
        assert_eq!(
            config.play_url("192.168.1.20"),
            "http://192.168.1.20:9000/app/cam/index.m3u8"
        );
    }

    #[tokio::test]
    async fn test_write_overwrites_deterministically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        tokio::fs::write(&path, "stale contents that are much longer than needed\n".repeat(20))
            .await
            .unwrap();

        let config = ServerConfig::new(8081, 1936, "live", "stream");
        config.write_to(&path).await.unwrap();
        let first = tokio::fs::read(&path).await.unwrap();
        config.write_to(&path).await.unwrap();
        let second = tokio::fs::read(&path).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first, config.render().into_bytes());
    }
}
