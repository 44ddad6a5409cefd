// benches/tables.rs
use criterion::{criterion_group, criterion_main, Criterion, black_box};

use sfc_scrape::{
    config::Config,
    core::{Fetch, FetchError},
    data::FirmStub,
    specs::{parse_list, FirmDetailParser},
};

const BASE: &str = "https://webb-site.com/dbpub/SFClicount.asp";

struct Offline;

impl Fetch for Offline {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        Err(FetchError::Status { url: url.to_string(), status: 404 })
    }
}

fn listing(rows: usize) -> String {
    let mut html = String::from(
        "<html><body><table><tr><th>Row</th><th>Name</th><th>RO</th><th>Rep</th>\
         <th>Total</th><th>Licence start</th><th>Licence end</th></tr>",
    );
    for i in 0..rows {
        html.push_str(&format!(
            "<tr><td>{i}</td><td><a href=\"SFClicensees.asp?p={i}\">Firm {i} Ltd</a></td>\
             <td>1</td><td>2</td><td>3</td><td>{:02}-Mar-2023</td><td></td></tr>",
            i % 28 + 1
        ));
    }
    html.push_str("</table></body></html>");
    html
}

fn detail(rows: usize) -> String {
    let mut html = String::from(
        "<html><body><p>Licence start</p><p>01-Jan-2015</p><table>\
         <tr><th>Name</th><th>Age</th><th>SFC ID</th><th>Role</th><th>From</th><th>Until</th></tr>",
    );
    for i in 0..rows {
        html.push_str(&format!(
            "<tr><td><a href=\"natperson.asp?p={i}\">Person {i}</a></td><td>40</td><td>ID{i}</td>\
             <td>Representative</td><td>2019/05/{:02}</td><td>{}</td></tr>",
            i % 28 + 1,
            if i % 3 == 0 { "2021-12-31" } else { "" }
        ));
    }
    html.push_str("</table></body></html>");
    html
}

fn bench_tables(c: &mut Criterion) {
    let list = listing(2_000);
    c.bench_function("list_page_2000_rows", |b| {
        b.iter(|| black_box(parse_list(black_box(&list), BASE).len()))
    });

    let page = detail(200);
    let cfg = Config::default();
    let parser = FirmDetailParser::new(&Offline, &cfg);
    let stub = FirmStub {
        firm_name: "Bench Capital".into(),
        firm_url: "https://webb-site.com/dbpub/SFClicensees.asp?p=1".into(),
        ..FirmStub::default()
    };
    c.bench_function("detail_page_200_licensees", |b| {
        b.iter(|| black_box(parser.parse(&stub, black_box(&page)).licensees.len()))
    });
}

criterion_group!(benches, bench_tables);
criterion_main!(benches);
