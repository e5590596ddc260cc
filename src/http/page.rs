//! The switch's only page.
//!
//! Both buttons share the form's GET action; the clicked button's name and
//! value become the query (`?0=ON` or `?1=OFF`).

pub const INDEX_HTML: &str = "<!DOCTYPE html>\n\
<html>\n\
<head>\n\
<meta name='viewport' content='initial-scale=1.5'>\n\
</head>\n\
<body>\n\
<form method='get'>\n\
ESP-WROOM-32<br>\n\
Wi-Fi  LED  Switch<br><br>\n\
<input type='submit' name=0 value='ON' style='background-color:#88ff88; color:red;'>\n\
<input type='submit' name=1 value='OFF' style='background-color:black; color:white;'>\n\
</form>\n\
</body>\n\
</html>\n";
