// src/macros.rs

/// `s!()` is an empty `String`; `s!(x)` is `String::from(x)`.
#[macro_export]
macro_rules! s {
    () => {
        ::std::string::String::new()
    };
    ($expr:expr) => {
        ::std::string::String::from($expr)
    };
}

/// Concatenate string slices into a new `String`, sized up front.
///
/// `join!("<", tag, ">")` builds `"<td>"` for `tag = "td"`.
#[macro_export]
macro_rules! join {
    ($($part:expr),+ $(,)?) => {
        <[&str]>::concat(&[$(::std::convert::AsRef::<str>::as_ref(&$part)),+])
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn join_mixes_literals_and_owned() {
        let tag = s!("td");
        assert_eq!(join!("</", &tag, ">"), "</td>");
        assert_eq!(join!("solo"), "solo");
        assert_eq!(s!(), "");
    }
}
