//! Deep link into the CloudWatch Logs console for the notified event.

/// Builds a console URL for the log stream, filtered to the slow query's
/// timestamp.
///
/// The `logsV2` console expects each path segment double URL-encoded and
/// every percent sign rewritten to `$`. The filter-pattern suffix keeps `+`
/// literal (it stands for the space inside the quoted timestamp).
pub fn logs_url(region: &str, log_group: &str, log_stream: &str, executed_at: &str) -> String {
    let base = format!(
        "https://{region}.console.aws.amazon.com/cloudwatch/home?region={region}#logsV2:log-groups/log-group/"
    );
    let group = quote_plus(&quote_plus(log_group));
    let stream = quote_plus(&quote_plus(log_stream));
    let filter_inner = quote_plus(&format!("\"{executed_at}\""));
    let filter = quote_plus(&format!("?filterPattern={filter_inner}")).replace("%2B", "+");

    format!("{base}{group}/log-events/{stream}{filter}").replace('%', "$")
}

// URL-encode with spaces rendered as `+`, the form the console's filter
// syntax uses.
fn quote_plus(value: &str) -> String {
    urlencoding::encode(value).replace("%20", "+")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn logs_url_double_encodes_group_and_filters_on_timestamp() {
        let url = logs_url(
            "ap-northeast-1",
            "/aws/rds/instance/db/postgresql",
            "db-instance.0",
            "2020-01-01 12:00:00",
        );

        assert_eq!(
            url,
            "https://ap-northeast-1.console.aws.amazon.com/cloudwatch/home?region=ap-northeast-1\
             #logsV2:log-groups/log-group/$252Faws$252Frds$252Finstance$252Fdb$252Fpostgresql\
             /log-events/db-instance.0\
             $3FfilterPattern$3D$25222020-01-01+12$253A00$253A00$2522"
        );
    }

    #[test]
    fn quote_plus_renders_spaces_as_plus() {
        assert_eq!(quote_plus("\"a b\""), "%22a+b%22");
    }
}
