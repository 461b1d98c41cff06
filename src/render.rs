//! HTML rendering for the detail view and the editor page.

use crate::store::Record;

/// Minimal HTML escape; record fields come from an editable text file,
/// so they are interpolated as text, never as markup.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

pub fn detail_page(record: &Record) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title}</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        h2 {{ color: #4CAF50; }}
        .label {{ font-weight: bold; }}
        .info {{ margin-top: 15px; }}
    </style>
</head>
<body>
    <h2>{title}</h2>
    <div class="info"><span class="label">Where to keep:</span> {location}</div>
    <div class="info"><span class="label">Use:</span> {use_}</div>
    <div class="info"><span class="label">Category:</span> {category}</div>
</body>
</html>
"#,
        title = escape_html(&record.title),
        location = escape_html(&record.location),
        use_ = escape_html(&record.use_),
        category = escape_html(&record.category),
    )
}

pub fn not_found_page(code: &str) -> String {
    format!("<h3>No entry found for {}</h3>", escape_html(code))
}

/// Static editor page driving /get_qr_details and /update_qr_details.
pub const EDIT_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <title>Edit QR Details</title>
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <style>
        body { font-family: Arial; padding: 20px; }
        input, textarea { width: 100%; padding: 10px; margin: 5px 0; }
        button { padding: 10px 20px; }
    </style>
</head>
<body>
    <h2>Edit QR Details</h2>
    <input type="text" id="title" placeholder="Enter title and press Fetch">
    <button onclick="fetchDetails()">Fetch</button>
    <textarea id="location" placeholder="Location"></textarea>
    <textarea id="use" placeholder="Use"></textarea>
    <textarea id="category" placeholder="Category"></textarea>
    <button onclick="updateDetails()">Update</button>
    <p id="response"></p>
    <script>
        function fetchDetails() {
            const title = document.getElementById('title').value;
            fetch(`/get_qr_details?title=${encodeURIComponent(title)}`)
            .then(res => res.json())
            .then(data => {
                if (data.error) return alert(data.error);
                document.getElementById('location').value = data.location;
                document.getElementById('use').value = data.use;
                document.getElementById('category').value = data.category;
            });
        }

        function updateDetails() {
            const title = document.getElementById('title').value;
            const location = document.getElementById('location').value;
            const use = document.getElementById('use').value;
            const category = document.getElementById('category').value;

            fetch('/update_qr_details', {
                method: 'POST',
                headers: {'Content-Type': 'application/json'},
                body: JSON.stringify({ title, location, use, category })
            })
            .then(res => res.json())
            .then(data => {
                document.getElementById('response').innerText = data.message || data.error;
            });
        }
    </script>
</body>
</html>
"#;
