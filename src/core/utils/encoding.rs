use percent_encoding::{percent_decode_str, percent_encode, AsciiSet, CONTROLS};

/// https://url.spec.whatwg.org/#fragment-percent-encode-set
const FRAGMENT: &AsciiSet = &CONTROLS.add(b' ').add(b'"').add(b'<').add(b'>').add(b'`');

/// https://url.spec.whatwg.org/#path-percent-encode-set
const PATH: &AsciiSet = &FRAGMENT.add(b'#').add(b'?').add(b'{').add(b'}');

/// https://url.spec.whatwg.org/#userinfo-percent-encode-set
const USERINFO: &AsciiSet = &PATH
    .add(b'/')
    .add(b':')
    .add(b';')
    .add(b'=')
    .add(b'@')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'|');

/// Channel names and key names are used as a single path segment, so
/// separators have to be escaped too.
const COMPONENT_SET: &AsciiSet = &USERINFO.add(b'+').add(b'%').add(b'&').add(b',');

/// `percent_encoding` crate recommends you to create your own set for encoding.
/// To be consistent in the whole codebase - we created a function that can be used
/// for encoding related stuff.
pub fn url_encode(data: &[u8]) -> String {
    percent_encode(data, COMPONENT_SET).to_string()
}

/// Decode percent-encoded string.
///
/// `+` is treated as an encoded space the way `application/x-www-form-urlencoded`
/// query strings do. Malformed UTF-8 sequences are replaced.
pub fn url_decode(data: &str) -> String {
    percent_decode_str(&data.replace('+', " "))
        .decode_utf8_lossy()
        .to_string()
}

#[cfg(test)]
mod should {
    use super::*;
    use test_case::test_case;

    #[test_case("persisted:presence_fixtures" => "persisted%3Apresence_fixtures"; "namespace")]
    #[test_case("a b/c" => "a%20b%2Fc"; "space and slash")]
    #[test_case("100%+" => "100%25%2B"; "percent and plus")]
    #[test_case("plain" => "plain"; "nothing to escape")]
    fn encode_path_segment(input: &str) -> String {
        url_encode(input.as_bytes())
    }

    #[test_case("persisted%3Apresence" => "persisted:presence"; "colon")]
    #[test_case("a+b" => "a b"; "plus as space")]
    #[test_case("a%2Bb" => "a+b"; "encoded plus")]
    fn decode_query_value(input: &str) -> String {
        url_decode(input)
    }
}
