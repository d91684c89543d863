//! 预览地址：按模板展开 `:year` `:month` `:day` `:title`

use chrono::{Datelike, NaiveDate};

/// 展开预览地址模板。`:month` 与 `:day` 补零为两位。
pub(crate) fn preview_url(template: &str, date: NaiveDate, title: &str) -> String {
    template
        .replace(":year", &format!("{:04}", date.year()))
        .replace(":month", &format!("{:02}", date.month()))
        .replace(":day", &format!("{:02}", date.day()))
        .replace(":title", title)
}

/// 浏览器打开时需要协议头；模板未写协议时补 http://
pub(crate) fn browsable(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}
