//! HTML views for the input form and the result page

use crate::models::PredictResponse;

const STYLE: &str = "body{font-family:sans-serif;max-width:40em;margin:2em auto}\
label{display:block;margin-top:.6em}input,select{width:100%;padding:.3em}\
.error{color:#a00}.fraud{color:#a00;font-weight:bold}table{border-collapse:collapse}\
td{padding:.2em .8em;border-bottom:1px solid #ddd}";

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{body}</body>\n</html>\n",
        title = escape(title),
    )
}

/// Escape text for use in element content and quoted attributes
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Decimal text that always keeps a fractional part (`170136.0`, not `170136`)
fn decimal(value: f64) -> String {
    format!("{:?}", value)
}

/// The input form posted to `/predict`
pub fn render_form() -> String {
    let body = r#"<h1>Fraud Detection</h1>
<form action="/predict" method="post">
<label for="type">Transaction type</label>
<select id="type" name="type">
<option value="CASH_OUT">CASH_OUT</option>
<option value="PAYMENT">PAYMENT</option>
<option value="CASH_IN">CASH_IN</option>
<option value="TRANSFER">TRANSFER</option>
<option value="DEBIT">DEBIT</option>
</select>
<label for="step">Step (hour)</label>
<input id="step" name="step" type="number" step="1" required>
<label for="amount">Amount</label>
<input id="amount" name="amount" type="number" step="any" required>
<label for="oldbalanceOrg">Originator balance before</label>
<input id="oldbalanceOrg" name="oldbalanceOrg" type="number" step="any" required>
<label for="newbalanceOrig">Originator balance after</label>
<input id="newbalanceOrig" name="newbalanceOrig" type="number" step="any" required>
<p><button type="submit">Predict</button></p>
</form>
"#;
    page("Fraud Detection", body)
}

/// Result page for a scored transaction
pub fn render_result(result: &PredictResponse) -> String {
    let input = &result.input;
    let mut body = String::from("<h1>Prediction Result</h1>\n");

    let verdict = if result.prediction == 1 {
        "<p class=\"fraud\">Fraudulent transaction</p>\n"
    } else {
        "<p>Legitimate transaction</p>\n"
    };
    body.push_str(verdict);

    let probability = result
        .probability
        .iter()
        .map(|p| decimal(*p))
        .collect::<Vec<_>>()
        .join(", ");

    body.push_str(&format!(
        "<table>\n\
         <tr><td>prediction</td><td id=\"prediction\">{}</td></tr>\n\
         <tr><td>probability</td><td id=\"probability\">[{}]</td></tr>\n\
         <tr><td>type</td><td>{}</td></tr>\n\
         <tr><td>step</td><td>{}</td></tr>\n\
         <tr><td>amount</td><td>{}</td></tr>\n\
         <tr><td>oldbalanceOrg</td><td>{}</td></tr>\n\
         <tr><td>newbalanceOrig</td><td>{}</td></tr>\n\
         </table>\n",
        result.prediction,
        probability,
        escape(&input.transaction_type),
        input.step,
        decimal(input.amount),
        decimal(input.old_balance_org),
        decimal(input.new_balance_orig),
    ));
    body.push_str("<p><a href=\"/\">Score another transaction</a></p>\n");

    page("Prediction Result", &body)
}

/// Result page carrying only an error message
pub fn render_error(message: &str) -> String {
    let body = format!(
        "<h1>Prediction Result</h1>\n<p class=\"error\" id=\"error\">Error: {}</p>\n\
         <p><a href=\"/\">Back to the form</a></p>\n",
        escape(message)
    );
    page("Prediction Result", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TransactionInput;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x & 'y'")</script>"#),
            "&lt;script&gt;alert(&quot;x &amp; &#x27;y&#x27;&quot;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_form_fields() {
        let html = render_form();
        for field in ["type", "step", "amount", "oldbalanceOrg", "newbalanceOrig"] {
            assert!(html.contains(&format!("name=\"{}\"", field)), "{field}");
        }
        assert!(html.contains("action=\"/predict\""));
    }

    #[test]
    fn test_result_echoes_input() {
        let html = render_result(&PredictResponse {
            prediction: 0,
            probability: vec![0.75, 0.25],
            input: TransactionInput {
                transaction_type: "TRANSFER".to_string(),
                step: 1,
                amount: 9839.64,
                old_balance_org: 170136.0,
                new_balance_orig: 160296.36,
            },
        });
        assert!(html.contains("<td id=\"prediction\">0</td>"));
        assert!(html.contains("[0.75, 0.25]"));
        assert!(html.contains("TRANSFER"));
        assert!(html.contains("<td>9839.64</td>"));
        assert!(html.contains("<td>170136.0</td>"));
        assert!(!html.contains("id=\"error\""));
    }

    #[test]
    fn test_whole_decimals_keep_fraction() {
        assert_eq!(decimal(170136.0), "170136.0");
        assert_eq!(decimal(0.0), "0.0");
        assert_eq!(decimal(160296.36), "160296.36");
    }

    #[test]
    fn test_error_page_has_no_result() {
        let html = render_error("unsupported transaction type '<b>'");
        assert!(html.contains("unsupported transaction type &#x27;&lt;b&gt;&#x27;"));
        assert!(!html.contains("id=\"prediction\""));
    }
}
