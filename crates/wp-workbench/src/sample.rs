//! The one-click sample: an nginx access log line, a rule that parses it and
//! an OML script that transforms the result.

pub const SAMPLE_LOG: &str = r#"222.133.52.20 - - [06/Aug/2019:12:12:19 +0800] "GET /nginx-logo.png HTTP/1.1" 200 368 "http://119.122.1.4/" "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_14_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/75.0.3770.142 Safari/537.36" "-""#;

pub const SAMPLE_RULE: &str = r#"package /example/simple {
  rule nginx {
        (ip:sip,_^2,time:recv_time<[,]>,http/request",http/status,digit,chars",http/agent",_")
  }
}"#;

pub const SAMPLE_OML: &str = "name : /oml/example/simple

rule :
    /example/simple*
---
recv_time  = take() ;
occur_time = Now::time() ;
from_ip    = take(option:[from-ip]) ;
src_ip     = take(option:[src-ip,sip,source-ip] );
*  = take() ;";
