//! # Index Templates
//!
//! @title HTML Index Templates
//! @author Ramprasad
//!
//! Handlebars templates for the static report index.

/// Template name of the full document.
pub const INDEX: &str = "index";

/// Template name of a single contract card.
pub const CARD: &str = "card";

/// Page shell: styles, run header and the card container.
pub const INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <meta charset="UTF-8">
    <title>{{title}}</title>
    <style>
        body {
            display: flex;
            flex-direction: column;
            align-items: center;
        }
        main {
            display: flex;
            width: 90%;
            justify-content: space-around;
            flex-wrap: wrap;
        }
        .card {
            box-shadow: 0 4px 8px 0 rgba(0,0,0,0.2);
            transition: 0.3s;
            padding: 2px 16px;
            width: 20vw;
            min-width: 100px;
            max-width: 300px;
            margin-bottom: 16px;
        }
        .card>h3 {
            text-overflow: ellipsis;
            overflow: hidden;
        }
        .card:hover {
            box-shadow: 0 8px 16px 0 rgba(0,0,0,0.2);
        }
        .container {
            padding: 2px 16px;
        }
    </style>
  </head>
  <body>
    <header>
      <h1>{{title}}</h1>
      <h5>{{header.date}}</h5>
      <hr>
      <aside>
        <h4>git info</h4>
        <p>Repository URL {{header.git_origin_url}}</p>
        <p>Branch {{header.git_ref}}</p>
        <p>Commit {{header.git_commit}}</p>
      </aside>
    </header>
    <main>
{{#each entries}}{{> card}}{{/each}}
    </main>
  </body>
</html>
"#;

/// One card per processed contract.
pub const CARD_TEMPLATE: &str = r#"      <div class="card">
        <h3>{{label}}</h3>
        <hr>
        <div class="container">
          <p><a href="{{report_href}}">Report</a></p>
          <p><a href="{{source_href}}">Source</a></p>
        </div>
      </div>
"#;
